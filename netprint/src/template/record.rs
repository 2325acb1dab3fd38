//! Running a template over raw text.

use indexmap::IndexMap;
use log::trace;

use super::Template;
use crate::error::TemplateError;

/// One parsed row: field name to value, in template declaration order.
pub type ParsedRecord = IndexMap<String, String>;

/// Look a field up ignoring the case of its name.
pub fn field<'a>(record: &'a ParsedRecord, name: &str) -> Option<&'a str> {
    record
        .get(name)
        .or_else(|| {
            record
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

/// Compile `template` and parse `text` with it.
///
/// Field names in the returned records are spelled as in the template's
/// `Value` lines.
pub fn parse(template: &Template, text: &str) -> Result<Vec<ParsedRecord>, TemplateError> {
    let compiled = textfsm_rust::Template::parse_str(&template.body).map_err(|e| {
        TemplateError::InvalidTemplate {
            id: template.id.clone(),
            reason: e.to_string(),
        }
    })?;

    let mut parser = compiled.parser();
    let rows = parser
        .parse_text_to_dicts(text)
        .map_err(|e| TemplateError::Parse {
            id: template.id.clone(),
            reason: e.to_string(),
        })?;

    let header = value_names(&template.body);
    trace!("{}: {} rows over {:?}", template.id, rows.len(), header);

    Ok(rows
        .into_iter()
        .map(|mut row| {
            let mut record = ParsedRecord::with_capacity(row.len());
            for name in &header {
                let value = row
                    .remove(name.as_str())
                    .or_else(|| row.remove(&name.to_lowercase()));
                if let Some(value) = value {
                    record.insert(name.clone(), value);
                }
            }
            // Anything the header scan missed keeps the parser's spelling.
            let mut rest: Vec<_> = row.into_iter().collect();
            rest.sort();
            record.extend(rest);
            record
        })
        .collect())
}

/// Names declared by the `Value` lines of a TextFSM body, in order.
///
/// A value line is `Value [Option[,Option...]] NAME (regex)`; the name is the
/// token right before the regex.
fn value_names(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim_start)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix("Value "))
        .filter_map(|decl| {
            let tokens: Vec<&str> = decl.split_whitespace().collect();
            let regex_at = tokens.iter().position(|t| t.starts_with('('))?;
            regex_at.checked_sub(1).map(|i| tokens[i].to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::fixtures::*;

    #[test]
    fn test_value_names() {
        let body = "Value Required,Filldown HOSTNAME (\\S+)\nValue List VLANS (\\d+)\nValue Key MODEL (\\S+ \\(x\\))\n\nStart\n  ^Value NOT_A_VALUE (x)\n";
        assert_eq!(value_names(body), vec!["HOSTNAME", "VLANS", "MODEL"]);
    }

    #[test]
    fn test_parse_keeps_declared_names_and_order() {
        let template = Template::new("1", "cisco_ios_show_version", CISCO_IOS_SHOW_VERSION);
        let records = parse(&template, CISCO_IOS_SHOW_VERSION_OUTPUT).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        let names: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["VERSION", "HOSTNAME", "UPTIME", "HARDWARE", "SERIAL", "MODEL", "OS"]
        );
        assert_eq!(field(record, "version"), Some("15.0(2)SE11"));
        assert_eq!(field(record, "MODEL"), Some("WS-C3750X-48P-S"));
        assert_eq!(field(record, "hostname"), Some("sw-core-01"));
        assert_eq!(field(record, "missing"), None);
    }

    #[test]
    fn test_parse_invalid_template() {
        let template = Template::new("bad", "x_show_version", "Value BROKEN ([a-z\n\nNotStart\n  ^${NOPE}\n");
        assert!(matches!(
            parse(&template, "anything"),
            Err(TemplateError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_parse_multiple_records() {
        let template = Template::new(
            "cdp",
            "cisco_ios_show_cdp_neighbors_detail",
            CISCO_IOS_SHOW_CDP_NEIGHBORS_DETAIL,
        );
        let records = parse(&template, CISCO_IOS_SHOW_CDP_NEIGHBORS_DETAIL_OUTPUT).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(field(&records[1], "NEIGHBOR_NAME"), Some("dist-sw-03"));
        assert_eq!(field(&records[0], "MGMT_ADDRESS"), Some("10.10.0.2"));
    }
}
