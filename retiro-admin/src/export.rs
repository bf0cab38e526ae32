//! CSV export of the registration snapshot
//!
//! Fixed column order, every field quoted, embedded quotes doubled. The
//! output reconstructs the original field values exactly when re-split
//! respecting the quoting, including values containing commas, quotes,
//! or newlines.

use chrono::NaiveDate;
use retiro_common::model::{HostingStatus, ParticipationType, RegistrationRecord};

/// Export column headers, in output order
const HEADERS: [&str; 12] = [
    "Enviado em",
    "Nome Civil",
    "Nome Espiritual",
    "Participação",
    "Hospedagem",
    "RG",
    "WhatsApp",
    "Transporte",
    "Pessoas",
    "Dias",
    "Restrições",
    "Tipo Sanguíneo",
];

/// Serialize the snapshot to CSV, one row per record
pub fn to_csv(records: &[RegistrationRecord]) -> String {
    let mut out = String::new();
    out.push_str(&join_row(HEADERS.iter().map(|h| h.to_string())));
    out.push('\n');

    for record in records {
        out.push_str(&join_row(row_fields(record).into_iter()));
        out.push('\n');
    }

    out
}

/// Download filename for the given date
pub fn export_filename(date: NaiveDate) -> String {
    format!("inscricoes_ano_novo_{}.csv", date.format("%Y-%m-%d"))
}

fn row_fields(record: &RegistrationRecord) -> Vec<String> {
    let participation = match record.participation_type {
        ParticipationType::Hosting => "Hospedagem",
        ParticipationType::DayUse => "Day Use",
    };
    let hosting_status = match record.hosting_status {
        Some(HostingStatus::Paid) => "Pago",
        Some(HostingStatus::Reserving) => "Reservando",
        None => "",
    };
    let submitted = record
        .submitted_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    vec![
        submitted,
        record.civil_name.clone(),
        record.spiritual_name.clone(),
        participation.to_string(),
        hosting_status.to_string(),
        record.identity_document.clone(),
        record.contact_phone.clone(),
        record.transportation.clone(),
        record.group_size.to_string(),
        record.selected_days_summary.clone(),
        record.dietary_restrictions.clone(),
        record.blood_type.clone(),
    ]
}

fn join_row(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|f| quote(&f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote one field: wrap in double quotes, double any embedded quote
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(name: &str) -> RegistrationRecord {
        RegistrationRecord {
            civil_name: name.to_string(),
            spiritual_name: String::new(),
            identity_document: "12345".to_string(),
            contact_phone: "5511999999999".to_string(),
            blood_type: "O+".to_string(),
            dietary_restrictions: String::new(),
            participation_type: ParticipationType::DayUse,
            hosting_status: None,
            days: HashMap::new(),
            transportation: String::new(),
            group_size: 1,
            selected_days_summary: "31/Dez, 02/Jan".to_string(),
            submitted_at: None,
        }
    }

    /// Split one CSV line back into fields, honoring quoting
    fn split_row(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        let mut in_quotes = false;

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                ',' if !in_quotes => {
                    fields.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        fields.push(current);
        fields
    }

    #[test]
    fn header_row_has_fixed_column_order() {
        let csv = to_csv(&[]);
        let header = split_row(csv.lines().next().unwrap());
        assert_eq!(header[0], "Enviado em");
        assert_eq!(header[1], "Nome Civil");
        assert_eq!(header[9], "Dias");
        assert_eq!(header[11], "Tipo Sanguíneo");
        assert_eq!(header.len(), 12);
    }

    #[test]
    fn fields_with_delimiters_and_quotes_round_trip() {
        let mut r = record("Silva, Maria \"Mari\"");
        r.dietary_restrictions = "Sem glúten, sem lactose".to_string();

        let csv = to_csv(&[r]);
        let row = split_row(csv.lines().nth(1).unwrap());
        assert_eq!(row[1], "Silva, Maria \"Mari\"");
        assert_eq!(row[10], "Sem glúten, sem lactose");
        assert_eq!(row[9], "31/Dez, 02/Jan");
    }

    #[test]
    fn one_row_per_record_plus_header() {
        let csv = to_csv(&[record("Ana"), record("Bia")]);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn hosting_row_carries_translated_status() {
        let mut r = record("Ana");
        r.participation_type = ParticipationType::Hosting;
        r.hosting_status = Some(HostingStatus::Paid);

        let csv = to_csv(&[r]);
        let row = split_row(csv.lines().nth(1).unwrap());
        assert_eq!(row[3], "Hospedagem");
        assert_eq!(row[4], "Pago");
    }

    #[test]
    fn filename_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        assert_eq!(export_filename(date), "inscricoes_ano_novo_2025-12-30.csv");
    }
}
