use anyhow::{Result, bail};
use snmp2::Pdu;

use super::oid::AdminStatusBinding;

/// Имя error-status из RFC 3416
pub fn error_status_name(code: u32) -> &'static str {
    match code {
        0 => "noError",
        1 => "tooBig",
        2 => "noSuchName",
        3 => "badValue",
        4 => "readOnly",
        5 => "genErr",
        6 => "noAccess",
        7 => "wrongType",
        8 => "wrongLength",
        9 => "wrongEncoding",
        10 => "wrongValue",
        11 => "noCreation",
        12 => "inconsistentValue",
        13 => "resourceUnavailable",
        14 => "commitFailed",
        15 => "undoFailed",
        16 => "authorizationError",
        17 => "notWritable",
        18 => "inconsistentName",
        _ => "unknownError",
    }
}

/// Проверяет ответ агента на SET
pub fn check_response(
    pdu: Pdu<'_>,
    bindings: &[AdminStatusBinding],
    report_oid_mismatch: bool,
) -> Result<()> {
    check_status(pdu.error_status as u32, pdu.error_index as u32)?;

    if report_oid_mismatch {
        let received = pdu.varbinds.map(|(oid, _)| oid.to_string());
        check_oids(received, bindings)?;
    }

    Ok(())
}

pub fn check_status(error_status: u32, error_index: u32) -> Result<()> {
    if error_status != 0 {
        bail!(
            "Agent rejected SET: {} (error-index {})",
            error_status_name(error_status),
            error_index
        );
    }
    Ok(())
}

pub fn check_oids<I>(received: I, bindings: &[AdminStatusBinding]) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let received: Vec<String> = received.into_iter().collect();

    if received.len() != bindings.len() {
        bail!(
            "Response carries {} varbinds, expected {}",
            received.len(),
            bindings.len()
        );
    }

    for (got, binding) in received.iter().zip(bindings) {
        if *got != binding.oid {
            bail!("OID mismatch in response: expected {}, got {}", binding.oid, got);
        }
    }

    Ok(())
}
