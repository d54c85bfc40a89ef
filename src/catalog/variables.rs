use crate::catalog::error::CatalogError;
use crate::catalog::{id_from_number_or_string, Payload};
use crate::http::HttpTransport;
use crate::settings::SENSORS_ENDPOINT;
use crate::types::ecv::Ecv;
use crate::types::variable::{LocalizedName, Variable};
use crate::types::variable_id::VariableId;
use crate::utils::{endpoint, value_as_label};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawSensor {
    #[serde(deserialize_with = "id_from_number_or_string")]
    id: u32,
    name: LocalizedName,
    #[serde(default)]
    unit: Value,
}

pub(crate) fn fetch_variables(
    transport: &dyn HttpTransport,
    base_url: &str,
) -> Result<Vec<Variable>, CatalogError> {
    let body = transport.get(&endpoint(base_url, SENSORS_ENDPOINT), &[])?;
    let variables = parse_variables(&body)?;
    info!("Loaded {} variables", variables.len());
    Ok(variables)
}

pub(crate) fn parse_variables(body: &str) -> Result<Vec<Variable>, CatalogError> {
    let payload: Payload<RawSensor> = serde_json::from_str(body)?;
    Ok(payload
        .data
        .into_iter()
        .map(|raw| Variable {
            code: raw.id,
            name: raw.name.display().trim().to_string(),
            names: raw.name,
            unit: value_as_label(&raw.unit),
        })
        .collect())
}

/// Resolves `identifier` to a sensor code.
///
/// Codes (numeric or all-digit strings) must exist in `variables`. Names are first
/// translated if they are an ECV synonym, then matched exactly against the display
/// names; exactly one sensor must match.
pub(crate) fn resolve_variable(
    variables: &[Variable],
    identifier: &VariableId,
) -> Result<u32, CatalogError> {
    let matches: Vec<u32> = match (identifier.as_code(), identifier) {
        (Some(code), _) => variables
            .iter()
            .filter(|v| v.code == code)
            .map(|v| v.code)
            .take(1)
            .collect(),
        (None, VariableId::Name(name)) => {
            let name = name.trim();
            let canonical = match name.parse::<Ecv>().ok().and_then(|ecv| ecv.agrometeo_name()) {
                Some(synonym) => {
                    debug!("Variable '{}' is a synonym for '{}'", name, synonym);
                    synonym
                }
                None => name,
            };
            variables
                .iter()
                .filter(|v| v.name == canonical)
                .map(|v| v.code)
                .collect()
        }
        (None, VariableId::Code(_)) => Vec::new(),
    };

    match matches.as_slice() {
        [code] => Ok(*code),
        _ => Err(CatalogError::InvalidVariable {
            identifier: identifier.to_string(),
            matches: matches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SENSORS_JSON;

    fn variables() -> Vec<Variable> {
        parse_variables(SENSORS_JSON).unwrap()
    }

    #[test]
    fn display_names_are_trimmed() {
        let vars = variables();
        let temperature = vars.iter().find(|v| v.code == 1).unwrap();
        assert_eq!(temperature.name, "Temperature 2m above ground");
        assert_eq!(temperature.unit.as_deref(), Some("°C"));
        assert_eq!(temperature.names.get("de"), Some("Temperatur 2m über Boden"));

        let dew_point = vars.iter().find(|v| v.code == 13).unwrap();
        assert_eq!(dew_point.name, "Dew point");
        assert_eq!(dew_point.unit, None);
    }

    #[test]
    fn code_name_and_synonym_agree() {
        let vars = variables();
        let forms: [VariableId; 5] = [
            1u32.into(),
            1i32.into(),
            "1".into(),
            "Temperature 2m above ground".into(),
            "temperature".into(),
        ];
        for form in forms {
            assert_eq!(resolve_variable(&vars, &form).unwrap(), 1, "{form}");
        }
        assert_eq!(resolve_variable(&vars, &"water_vapour".into()).unwrap(), 4);
        assert_eq!(resolve_variable(&vars, &"Dew point".into()).unwrap(), 13);
    }

    #[test]
    fn unknown_identifiers_are_invalid() {
        let vars = variables();
        for form in [
            VariableId::from(77u32),
            VariableId::from("77"),
            VariableId::from(-1i32),
            VariableId::from("Snow depth"),
            VariableId::from("surface_radiation_longwave"),
        ] {
            assert!(
                matches!(
                    resolve_variable(&vars, &form),
                    Err(CatalogError::InvalidVariable { matches: 0, .. })
                ),
                "{form}"
            );
        }
    }

    #[test]
    fn ambiguous_names_are_invalid() {
        let result = resolve_variable(&variables(), &"Soil temperature -10cm".into());
        assert!(matches!(
            result,
            Err(CatalogError::InvalidVariable { matches: 2, .. })
        ));
    }
}
