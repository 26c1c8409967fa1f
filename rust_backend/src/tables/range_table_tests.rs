#[cfg(test)]
mod tests {
    use crate::error::ObError;
    use crate::models::ParamValue;
    use crate::tables::fixtures::RANGE_TABLE_JSON;
    use crate::tables::range_table::{RangeBound, RangeTable};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ACQ: &str = "GRAVITY_gen_acq.tsf";
    const OBS: &str = "GRAVITY_single_obs_exp.tsf";

    fn table() -> RangeTable {
        RangeTable::from_json_str(RANGE_TABLE_JSON).expect("fixture table parses")
    }

    #[test]
    fn test_min_max_is_inclusive() {
        let t = table();
        assert!(t.is_in_range(OBS, "DET2.NDIT.OBJECT", &ParamValue::Int(1)).unwrap());
        assert!(t.is_in_range(OBS, "DET2.NDIT.OBJECT", &ParamValue::Int(300)).unwrap());
        assert!(!t.is_in_range(OBS, "DET2.NDIT.OBJECT", &ParamValue::Int(301)).unwrap());
        assert!(!t.is_in_range(OBS, "DET2.NDIT.OBJECT", &ParamValue::Int(0)).unwrap());
    }

    #[test]
    fn test_text_value_fails_numeric_range() {
        let t = table();
        let value = ParamValue::from("ten");
        assert!(!t.is_in_range(OBS, "DET2.NDIT.OBJECT", &value).unwrap());
    }

    #[test]
    fn test_list_membership() {
        let t = table();
        assert!(t.is_in_range(ACQ, "INS.SPEC.RES", &"MED".into()).unwrap());
        assert!(!t.is_in_range(ACQ, "INS.SPEC.RES", &"MEDIUM".into()).unwrap());
        // numeric lists compare across integer and float
        assert!(t.is_in_range(OBS, "DET2.DIT", &ParamValue::Float(10.0)).unwrap());
        assert!(t.is_in_range(OBS, "DET2.DIT", &ParamValue::Float(0.3)).unwrap());
        assert!(!t.is_in_range(OBS, "DET2.DIT", &ParamValue::Float(2.0)).unwrap());
    }

    #[test]
    fn test_space_separated_list_requires_every_token() {
        let t = table();
        assert!(t.is_in_range(OBS, "SEQ.OBSSEQ", &"O S O".into()).unwrap());
        assert!(t.is_in_range(OBS, "SEQ.OBSSEQ", &"O S O ".into()).unwrap());
        assert!(!t.is_in_range(OBS, "SEQ.OBSSEQ", &"O S X".into()).unwrap());
    }

    #[test]
    fn test_unconstrained_keyword_accepts_anything() {
        let t = table();
        assert!(t.is_in_range(ACQ, "SEQ.INS.SOBJ.NAME", &"HD 1234".into()).unwrap());
        assert!(t.is_in_range(ACQ, "SEQ.INS.SOBJ.NAME", &ParamValue::Int(-7)).unwrap());
    }

    #[test]
    fn test_aliases_resolve_to_shared_entry() {
        let t = table();
        for tpl in [
            "GRAVITY_single_obs_calibrator.tsf",
            "GRAVITY_dual_obs_exp.tsf",
            "GRAVITY_dual_obs_calibrator.tsf",
        ] {
            assert_eq!(
                t.get_range(tpl, "SEQ.SKY.X").unwrap(),
                &RangeBound::MinMax {
                    min: -4000.0,
                    max: 4000.0
                }
            );
        }
    }

    #[test]
    fn test_unknown_template_and_keyword() {
        let t = table();
        let err = t.is_in_range("NOPE.tsf", "DET2.DIT", &ParamValue::Int(1)).unwrap_err();
        assert!(matches!(err, ObError::UnknownTemplate { .. }));
        assert!(err.to_string().contains("unknown template 'NOPE.tsf'"));

        let err = t.get_range(ACQ, "DET2.DIT").unwrap_err();
        assert!(matches!(err, ObError::UnknownKeyword { .. }));
        assert!(err.to_string().contains("unknown keyword 'DET2.DIT'"));

        assert!(t.get_range_defaults("NOPE.tsf").is_err());
    }

    #[test]
    fn test_defaults_keep_document_order() {
        let t = table();
        let defaults = t.get_range_defaults(ACQ).unwrap();
        let keys: Vec<&str> = defaults.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "SEQ.FI.HMAG",
                "SEQ.INS.SOBJ.MAG",
                "INS.SPEC.RES",
                "INS.FT.POL",
                "INS.SPEC.POL",
                "COU.AG.GSSOURCE",
                "COU.AG.PMA",
                "COU.AG.PMD",
                "TEL.TARG.PARALLAX",
            ]
        );
    }

    #[test]
    fn test_last_alias_match_wins() {
        let json = r#"{
            "A.tsf, B.tsf": { "X": { "min": 0, "max": 1 } },
            "B.tsf": { "X": { "min": 5, "max": 6 } }
        }"#;
        let t = RangeTable::from_json_str(json).unwrap();
        assert!(t.is_in_range("A.tsf", "X", &ParamValue::Int(1)).unwrap());
        assert!(t.is_in_range("B.tsf", "X", &ParamValue::Int(5)).unwrap());
        assert!(!t.is_in_range("B.tsf", "X", &ParamValue::Int(1)).unwrap());
    }

    #[test]
    fn test_mixed_descriptor_is_rejected() {
        let json = r#"{ "A.tsf": { "X": { "min": 0, "max": 1, "list": [0, 1] } } }"#;
        let err = RangeTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, ObError::TableLoad { .. }));

        let json = r#"{ "A.tsf": { "X": { "min": 0 } } }"#;
        assert!(RangeTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_from_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = RangeTable::from_file(file.path()).unwrap_err();
        match err {
            ObError::TableLoad { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(RangeTable::from_file("/nonexistent/GRAVITY_rangeTable.json").is_err());
    }
}
