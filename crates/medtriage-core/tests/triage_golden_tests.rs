//! Golden tests for the triage pipeline.
//!
//! Rule-level cases go through request validation and the classifier; demo
//! cases go through the full engine with demonstration mode on.

use std::sync::Arc;

use medtriage_core::{
    ConditionSource, KnowledgeBase, Scorer, TriageEngine, TriageLevel, TriageRequest,
};
use medtriage_model::KeywordModel;

/// Rule-level test case.
struct GoldenCase {
    id: &'static str,
    text: &'static str,
    age: f64,
    fever_temp_c: Option<f64>,
    duration_days: i64,
    risk_factors: &'static [&'static str],
    expected_level: TriageLevel,
    expected_red_flag: bool,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "bleeding-wont-stop",
            text: "severe bleeding, won't stop",
            age: 30.0,
            fever_temp_c: None,
            duration_days: 1,
            risk_factors: &[],
            expected_level: TriageLevel::Emergency,
            expected_red_flag: true,
        },
        GoldenCase {
            id: "mild-cold",
            text: "mild sore throat, runny nose",
            age: 25.0,
            fever_temp_c: None,
            duration_days: 3,
            risk_factors: &[],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "fussy-febrile-infant",
            text: "fussy baby",
            age: 0.5,
            fever_temp_c: Some(38.5),
            duration_days: 1,
            risk_factors: &[],
            expected_level: TriageLevel::Urgent,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "high-fever-productive-cough",
            text: "high fever and productive cough",
            age: 25.0,
            fever_temp_c: Some(39.5),
            duration_days: 5,
            risk_factors: &[],
            expected_level: TriageLevel::GpWithin48h,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "uppercase-red-flag",
            text: "Found him UNRESPONSIVE on the floor",
            age: 80.0,
            fever_temp_c: None,
            duration_days: 0,
            risk_factors: &["elder>65"],
            expected_level: TriageLevel::Emergency,
            expected_red_flag: true,
        },
        GoldenCase {
            id: "red-flag-inside-word",
            text: "preseizure aura",
            age: 40.0,
            fever_temp_c: None,
            duration_days: 0,
            risk_factors: &[],
            expected_level: TriageLevel::Emergency,
            expected_red_flag: true,
        },
        GoldenCase {
            id: "red-flag-beats-infant-fever",
            text: "baby has blue lips",
            age: 0.3,
            fever_temp_c: Some(39.0),
            duration_days: 1,
            risk_factors: &["infant<1y"],
            expected_level: TriageLevel::Emergency,
            expected_red_flag: true,
        },
        GoldenCase {
            id: "infant-fever-boundary",
            text: "not sleeping",
            age: 0.9,
            fever_temp_c: Some(38.0),
            duration_days: 0,
            risk_factors: &[],
            expected_level: TriageLevel::Urgent,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "infant-below-fever-threshold",
            text: "baby with a rash",
            age: 0.5,
            fever_temp_c: Some(37.9),
            duration_days: 2,
            risk_factors: &[],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "infant-zero-fever-is-unmeasured",
            text: "baby with a rash",
            age: 0.5,
            fever_temp_c: Some(0.0),
            duration_days: 2,
            risk_factors: &[],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "one-year-old-not-infant",
            text: "teething",
            age: 1.0,
            fever_temp_c: Some(38.5),
            duration_days: 1,
            risk_factors: &[],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "pregnant-urinary-flank-pain",
            text: "urinary burning with flank pain",
            age: 29.0,
            fever_temp_c: None,
            duration_days: 2,
            risk_factors: &["pregnancy"],
            expected_level: TriageLevel::Urgent,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "urinary-without-risk",
            text: "urinary burning with flank pain",
            age: 29.0,
            fever_temp_c: None,
            duration_days: 2,
            risk_factors: &[],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "asthma-is-not-high-risk",
            text: "breathless and wheezing",
            age: 35.0,
            fever_temp_c: None,
            duration_days: 1,
            risk_factors: &["asthma"],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "immunocompromised-prolonged-fever",
            text: "tired and achy",
            age: 50.0,
            fever_temp_c: Some(39.0),
            duration_days: 3,
            risk_factors: &["immunocompromised"],
            expected_level: TriageLevel::Urgent,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "fever-too-short-for-urgency",
            text: "tired and achy",
            age: 50.0,
            fever_temp_c: Some(39.4),
            duration_days: 2,
            risk_factors: &["immunocompromised"],
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        GoldenCase {
            id: "persistent-keyword",
            text: "persistent headache",
            age: 44.0,
            fever_temp_c: None,
            duration_days: 10,
            risk_factors: &[],
            expected_level: TriageLevel::GpWithin48h,
            expected_red_flag: false,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let kb = KnowledgeBase::builtin();
    let engine = TriageEngine::new(&kb, None);

    for case in get_golden_cases() {
        let request = TriageRequest {
            symptoms_text: case.text.to_string(),
            age: case.age,
            sex: None,
            duration_days: case.duration_days,
            fever_temp_c: case.fever_temp_c,
            risk_factors: case.risk_factors.iter().map(|s| s.to_string()).collect(),
            exposures: vec![],
        };
        let input = request
            .validate()
            .unwrap_or_else(|e| panic!("Case {}: invalid request: {}", case.id, e));

        let decision = engine.classifier().classify_input(&input);
        assert_eq!(
            decision.as_pair(),
            (case.expected_level, case.expected_red_flag),
            "Case {}: rule decision mismatch",
            case.id
        );

        let result = engine.evaluate(&input, false);
        assert_eq!(result.level, case.expected_level, "Case {}: level mismatch", case.id);
        assert_eq!(
            result.is_red_flag, case.expected_red_flag,
            "Case {}: red flag mismatch",
            case.id
        );
    }
}

/// Demonstration-mode test case.
struct DemoGoldenCase {
    id: &'static str,
    text: &'static str,
    age: f64,
    fever_temp_c: Option<f64>,
    expected_condition: &'static str,
    expected_level: TriageLevel,
    expected_red_flag: bool,
}

fn get_demo_cases() -> Vec<DemoGoldenCase> {
    vec![
        DemoGoldenCase {
            id: "cold",
            text: "mild sore throat, runny nose",
            age: 25.0,
            fever_temp_c: None,
            expected_condition: "Common Cold",
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "gastro",
            text: "watery diarrhea since yesterday",
            age: 31.0,
            fever_temp_c: None,
            expected_condition: "Gastroenteritis",
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "uti-raises-level",
            text: "burning sensation when I pee",
            age: 27.0,
            fever_temp_c: None,
            expected_condition: "Urinary Tract Infection",
            expected_level: TriageLevel::GpWithin48h,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "pink-eye",
            text: "red eye with yellow discharge",
            age: 8.0,
            fever_temp_c: None,
            expected_condition: "Conjunctivitis",
            expected_level: TriageLevel::HomeCare,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "bleeding-case-without-red-flag",
            text: "deep cut, gushing blood",
            age: 40.0,
            fever_temp_c: None,
            expected_condition: "Traumatic Injury",
            expected_level: TriageLevel::Emergency,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "appendicitis-red-flag",
            text: "severe abdominal pain lower right side",
            age: 19.0,
            fever_temp_c: None,
            expected_condition: "Suspected Appendicitis",
            expected_level: TriageLevel::Emergency,
            expected_red_flag: true,
        },
        DemoGoldenCase {
            id: "skin-infection",
            text: "pus in a cut on leg",
            age: 60.0,
            fever_temp_c: None,
            expected_condition: "Cellulitis",
            expected_level: TriageLevel::GpWithin48h,
            expected_red_flag: false,
        },
        DemoGoldenCase {
            id: "infant-fever",
            text: "baby fever since this morning",
            age: 0.5,
            fever_temp_c: Some(38.6),
            expected_condition: "Bronchiolitis",
            expected_level: TriageLevel::Urgent,
            expected_red_flag: false,
        },
    ]
}

#[test]
fn test_demo_golden_cases() {
    let kb = KnowledgeBase::builtin();
    let engine = TriageEngine::new(&kb, None);

    for case in get_demo_cases() {
        let request = TriageRequest {
            symptoms_text: case.text.to_string(),
            age: case.age,
            fever_temp_c: case.fever_temp_c,
            ..TriageRequest::default()
        };
        let input = request.validate().unwrap();
        let result = engine.evaluate(&input, true);

        assert_eq!(
            result.condition_source,
            ConditionSource::DemoCase,
            "Case {}: no demo case matched",
            case.id
        );
        assert_eq!(
            result.top_condition().map(|c| c.label.as_str()),
            Some(case.expected_condition),
            "Case {}: condition mismatch",
            case.id
        );
        assert_eq!(result.level, case.expected_level, "Case {}: level mismatch", case.id);
        assert_eq!(
            result.is_red_flag, case.expected_red_flag,
            "Case {}: red flag mismatch",
            case.id
        );
        assert!(!result.relief.is_empty(), "Case {}: relief missing", case.id);
    }
}

#[test]
fn test_keyword_model_path() {
    let kb = KnowledgeBase::builtin();
    let scorer: Arc<dyn Scorer> = Arc::new(KeywordModel::new());
    let engine = TriageEngine::new(&kb, Some(scorer));

    let input = TriageRequest::new("runny nose, sneezing and a sore throat")
        .validate()
        .unwrap();
    let result = engine.evaluate(&input, false);

    assert_eq!(result.condition_source, ConditionSource::Model);
    assert_eq!(result.level, TriageLevel::HomeCare);
    assert_eq!(result.top_condition().map(|c| c.label.as_str()), Some("Common Cold"));
    assert!(result.conditions.len() <= 5);
    assert!(result.relief.iter().any(|r| r.key == "Common Cold"));
}

#[test]
fn test_scorer_absent_still_triages() {
    let kb = KnowledgeBase::builtin();
    let engine = TriageEngine::new(&kb, None);

    let input = TriageRequest::new("chest pain radiating to arm").validate().unwrap();
    let result = engine.evaluate(&input, false);

    assert_eq!(result.level, TriageLevel::Emergency);
    assert!(result.is_red_flag);
    assert!(result.conditions.is_empty());
    assert_eq!(result.condition_source, ConditionSource::Unavailable);
}
