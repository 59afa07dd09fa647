use mallaplan::api_json::*;
use mallaplan::models::{SemesterKey, Term};

#[test]
fn test_parse_json_input_plan_guardado() {
    let json_data = r#"
    {
        "curriculum": "BSCS2020",
        "plan": [
            {"_id": "cs101", "year": 1, "term": "1", "status": "passed", "grade": "1.75"},
            {"course": "cs102", "year": "1", "term": 2},
            {"course_id": "ge1", "year": 1, "term": "midyear"}
        ]
    }
    "#;

    let req = parse_json_input(json_data).expect("Debe parsear el plan");
    assert_eq!(req.curriculum, "BSCS2020");
    assert_eq!(req.plan.len(), 3);
    assert_eq!(req.plan[0].grade.as_deref(), Some("1.75"));
    assert_eq!(req.plan[1].year, Some(1));
    assert_eq!(req.plan[2].term, Some(Term::Midyear));
}

#[test]
fn test_parse_json_input_sin_curriculum() {
    let err = parse_json_input(r#"{"curriculum": "", "plan": []}"#).unwrap_err();
    assert_eq!(err.to_string(), "curriculum is required");
}

#[test]
fn test_candidates_request_sin_destino() {
    let req = parse_candidates_request(serde_json::json!({"curriculum": "X", "term": "9", "year": 1})).unwrap();
    assert_eq!(req.target(), None);

    let req = parse_candidates_request(serde_json::json!({"curriculum": "X", "term": "2", "year": "3"})).unwrap();
    assert_eq!(req.target(), Some(SemesterKey::new(3, Term::Second)));
}
