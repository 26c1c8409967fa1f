#[cfg(test)]
mod tests {
    use crate::parsing::ob_parser::{parse_observation_block, parse_observation_block_str};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DUAL_FIELD_OB: &str = r#"{
        "interferometerConfiguration": { "stations": "UT1 UT2 UT3 UT4" },
        "instrumentConfiguration": { "instrumentMode": "HIGH-SPLIT" },
        "observationConfiguration": [
            {
                "type": "SCIENCE",
                "SCTarget": {
                    "name": "GJ 65 A",
                    "RA": "01:39:01.453",
                    "DEC": "-17:57:01.80",
                    "PMRA": 3321.0,
                    "PMDEC": 562.0,
                    "FLUX_V": 12.1,
                    "FLUX_H": 6.0,
                    "FLUX_K": 5.3
                },
                "FTTarget": {
                    "name": "GJ 65 B",
                    "RA": "01:39:01.300",
                    "DEC": "-17:57:02.10",
                    "FLUX_K": 5.7
                },
                "observationConstraints": { "LSTinterval": "00:30/03:00" }
            }
        ]
    }"#;

    #[test]
    fn test_parse_dual_field_block() {
        let ob = parse_observation_block_str(DUAL_FIELD_OB).unwrap();
        assert_eq!(ob.interferometer_configuration.stations, "UT1 UT2 UT3 UT4");
        assert_eq!(ob.instrument_configuration.instrument_mode, "HIGH-SPLIT");
        assert_eq!(ob.observation_configuration.len(), 1);

        let conf = &ob.observation_configuration[0];
        assert!(conf.is_science());
        assert_eq!(conf.sc_target.pmra, Some(3321.0));
        assert_eq!(conf.sc_target.diameter, None);
        assert_eq!(conf.ft_target.as_ref().unwrap().flux_k, Some(5.7));
        assert!(conf.ao_target.is_none());
        assert_eq!(conf.lst_interval(), Some("00:30/03:00"));
    }

    #[test]
    fn test_invalid_json_syntax() {
        let err = parse_observation_block_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON syntax"));
    }

    #[test]
    fn test_missing_configuration_key() {
        let err = parse_observation_block_str(r#"{ "interferometerConfiguration": {} }"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("observationConfiguration"));
        assert!(msg.contains("interferometerConfiguration"));
    }

    #[test]
    fn test_error_reports_field_path() {
        let json = r#"{
            "interferometerConfiguration": { "stations": "A0 B2 C1 D0" },
            "instrumentConfiguration": { "instrumentMode": "MEDIUM-COMBINED" },
            "observationConfiguration": [
                { "type": "SCIENCE", "SCTarget": { "name": "HD 1", "RA": "10.0000", "DEC": "-20.00", "FLUX_K": "bright" } }
            ]
        }"#;
        let err = parse_observation_block_str(json).unwrap_err();
        assert!(
            err.to_string()
                .contains("observationConfiguration[0].SCTarget.FLUX_K"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DUAL_FIELD_OB.as_bytes()).unwrap();

        let ob = parse_observation_block(file.path()).unwrap();
        assert_eq!(ob.observation_configuration[0].sc_target.name, "GJ 65 A");
    }

    #[test]
    fn test_missing_file() {
        let err = parse_observation_block(std::path::Path::new("/nonexistent/ob.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read JSON file"));
    }
}
