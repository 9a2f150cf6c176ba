use super::v2c::SnmpClientV2c;
use super::v3::SnmpClientV3;

/// Клиент конкретной версии протокола, выбирается по учётным данным задания
pub enum SnmpClient {
    V2c(SnmpClientV2c),
    V3(SnmpClientV3),
}
