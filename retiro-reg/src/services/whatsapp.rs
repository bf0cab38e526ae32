//! Messaging handoff link construction
//!
//! Builds the deterministic confirmation text for a frozen registration
//! record and wraps it into a `wa.me` deep link addressed to the
//! organizer. Producing the link is where this module's job ends: actual
//! delivery requires the user to send the pre-filled message themselves.

use retiro_common::config::EventInfo;
use retiro_common::model::{HostingStatus, ParticipationType, RegistrationRecord};

/// Human-readable confirmation body for one record.
///
/// The text must reflect the frozen record exactly as validated at
/// submission time; nothing here recomputes or reorders fields.
pub fn handoff_body(record: &RegistrationRecord, event: &EventInfo) -> String {
    let name_line = if record.spiritual_name.trim().is_empty() {
        record.civil_name.clone()
    } else {
        format!("{} ({})", record.civil_name, record.spiritual_name)
    };

    let restrictions = if record.dietary_restrictions.trim().is_empty() {
        "Nenhuma"
    } else {
        record.dietary_restrictions.as_str()
    };

    let mut body = format!(
        "*Inscrição - {}* 🌸\n*Com {}*\n\n*Nome:* {}\n*RG:* {}\n*Dias:* {}\n",
        event.title, event.guest, name_line, record.identity_document, record.selected_days_summary
    );

    if record.participation_type == ParticipationType::Hosting {
        let status = match record.hosting_status {
            Some(HostingStatus::Paid) => "Pago",
            Some(HostingStatus::Reserving) => "Reservando",
            None => "-",
        };
        body.push_str(&format!("*Hospedagem:* {}\n", status));
    }

    if record.group_size > 1 {
        body.push_str(&format!("*Acompanhantes:* {} pessoas\n", record.group_size));
    }

    body.push_str(&format!(
        "*Restrições:* {}\n\n_Enviado pelo App Oficial_",
        restrictions
    ));
    body
}

/// Deep link opening a chat with the organizer, pre-filled with the
/// confirmation body
pub fn handoff_link(organizer_phone: &str, record: &RegistrationRecord, event: &EventInfo) -> String {
    format!(
        "https://wa.me/{}?text={}",
        organizer_phone,
        percent_encode(&handoff_body(record, event))
    )
}

/// Percent-encode a string for use in a URI query value.
///
/// Unreserved characters (ALPHA / DIGIT / "-" / "." / "_" / "~") pass
/// through; every other byte of the UTF-8 encoding becomes %XX.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn day_use_record() -> RegistrationRecord {
        let mut days = HashMap::new();
        days.insert("day31".to_string(), true);
        days.insert("day02".to_string(), true);
        RegistrationRecord {
            civil_name: "Maria Silva".to_string(),
            spiritual_name: String::new(),
            identity_document: "12345".to_string(),
            contact_phone: "5511999999999".to_string(),
            blood_type: String::new(),
            dietary_restrictions: String::new(),
            participation_type: ParticipationType::DayUse,
            hosting_status: None,
            days,
            transportation: String::new(),
            group_size: 1,
            selected_days_summary: "31/Dez, 02/Jan".to_string(),
            submitted_at: None,
        }
    }

    #[test]
    fn percent_encoding_covers_reserved_and_utf8() {
        assert_eq!(percent_encode("abc-123_~.ok"), "abc-123_~.ok");
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
        // ã is 0xC3 0xA3 in UTF-8
        assert_eq!(percent_encode("ã"), "%C3%A3");
    }

    #[test]
    fn body_contains_exact_day_summary() {
        let record = day_use_record();
        let body = handoff_body(&record, &EventInfo::default());
        assert!(body.contains("31/Dez, 02/Jan"));
        assert!(body.contains("Maria Silva"));
        assert!(body.contains("*RG:* 12345"));
        assert!(body.contains("*Restrições:* Nenhuma"));
    }

    #[test]
    fn body_includes_spiritual_name_in_parens_when_present() {
        let mut record = day_use_record();
        record.spiritual_name = "Madhavi".to_string();
        let body = handoff_body(&record, &EventInfo::default());
        assert!(body.contains("Maria Silva (Madhavi)"));
    }

    #[test]
    fn hosting_body_carries_status_line() {
        let mut record = day_use_record();
        record.participation_type = ParticipationType::Hosting;
        record.hosting_status = Some(HostingStatus::Reserving);
        record.selected_days_summary = retiro_common::model::HOSTING_SUMMARY.to_string();

        let body = handoff_body(&record, &EventInfo::default());
        assert!(body.contains("*Hospedagem:* Reservando"));
        assert!(body.contains(retiro_common::model::HOSTING_SUMMARY));
    }

    #[test]
    fn link_addresses_organizer_and_encodes_body() {
        let record = day_use_record();
        let link = handoff_link("554896597389", &record, &EventInfo::default());
        assert!(link.starts_with("https://wa.me/554896597389?text="));
        // Encoded body must not contain raw spaces or asterisks
        let query = link.split_once("?text=").unwrap().1;
        assert!(!query.contains(' '));
        assert!(!query.contains('*'));
        assert!(query.contains("31%2FDez%2C%2002%2FJan"));
    }
}
