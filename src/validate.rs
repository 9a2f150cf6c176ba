use std::net::Ipv4Addr;

use thiserror::Error;

/// Ошибка синтаксической проверки параметров задания
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Supplied Device IP is not an IPv4 address. Got: '{0}'")]
    DeviceIp(String),
    #[error("Supplied Interface ID String has incorrect formatting. Got: '{0}'")]
    InterfaceRange(String),
}

/// Проверяет адрес устройства по строгой грамматике из четырёх октетов.
///
/// Октет: от одной до трёх цифр со значением 0-255, ведущие нули допустимы
/// (`010.0.0.1` принимается и нормализуется в `10.0.0.1`).
pub fn validate_device_ip(raw: &str) -> Result<Ipv4Addr, ValidationError> {
    let invalid = || ValidationError::DeviceIp(raw.to_string());

    let mut octets = [0u8; 4];
    let mut count = 0;

    for part in raw.split('.') {
        if count == octets.len() {
            return Err(invalid());
        }
        octets[count] = parse_octet(part).ok_or_else(invalid)?;
        count += 1;
    }

    if count != octets.len() {
        return Err(invalid());
    }

    Ok(Ipv4Addr::from(octets))
}

fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u16>().ok().and_then(|v| u8::try_from(v).ok())
}

/// Проверяет строку интерфейсов: `segment (',' segment)*`,
/// где сегмент это `N` или `N-M`.
pub fn validate_interface_range(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() || !raw.split(',').all(is_valid_segment) {
        return Err(ValidationError::InterfaceRange(raw.to_string()));
    }
    Ok(())
}

fn is_valid_segment(segment: &str) -> bool {
    match segment.split_once('-') {
        Some((start, end)) => is_number(start) && is_number(end),
        None => is_number(segment),
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
