//! End-to-end risk scoring scenarios.

use rule_engine::prelude::*;
use serde_json::json;
use std::sync::Arc;

struct EmploymentDetail {
    company: String,
}

struct UserData {
    name: String,
    age: i32,
    money: f64,
    employment: Option<EmploymentDetail>,
    friends: Vec<String>,
    order_count: u32,
}

impl Record for UserData {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Name" => Some((&self.name).into()),
            "Age" => Some((&self.age).into()),
            "Money" => Some((&self.money).into()),
            "Employment" => Some(match &self.employment {
                Some(detail) => FieldValue::Str(&detail.company),
                None => FieldValue::Nil,
            }),
            "Friends" => Some((&self.friends).into()),
            "OrderCount" => Some((&self.order_count).into()),
            _ => None,
        }
    }
}

fn user(money: f64, friends: &[&str]) -> UserData {
    UserData {
        name: "Jesse".to_string(),
        age: 29,
        money,
        employment: None,
        friends: friends.iter().map(|f| f.to_string()).collect(),
        order_count: 100,
    }
}

fn initialize_session() -> Results {
    let mut results = Results::new();
    results.insert("riskScore".to_string(), json!("lowRiskCategory"));
    results.insert("customerType".to_string(), json!("Normal"));
    results
}

fn update(key: &'static str, value: &'static str) -> impl Fn(&mut Results) -> ActionResult {
    move |results| {
        results.insert(key.to_string(), json!(value));
        Ok(())
    }
}

fn high_risk_condition() -> Condition<UserData> {
    Condition::any_of(vec![
        Condition::all_of(vec![greater_than("Money", 20000.0), is_nil("Employment")]),
        list_contains("Friends", "Tuco"),
    ])
}

fn risk_engine() -> RuleEngine<UserData> {
    let mut engine = RuleEngine::with_config(EngineConfig::new("risk-scoring"));
    engine.add_rules(vec![
        define_rule(
            Condition::custom(|data: &UserData| data.order_count >= 50, "High order count"),
            update("customerType", "HighValue"),
            "customer type = HighValue",
        ),
        define_rule(
            high_risk_condition(),
            update("riskScore", "highRiskCategory"),
            "risk level: highRiskCategory",
        ),
    ]);
    engine
}

#[test]
fn test_high_risk_via_and_branch() {
    let data = user(500000.0, &["Saul", "Mike", "Walter"]);

    let evaluation = high_risk_condition().evaluate(&data).unwrap();
    assert!(evaluation.is_match());
    assert_eq!(evaluation.branch(), Some(0));
    assert_eq!(
        evaluation.explanation().unwrap(),
        "[AND: Money > 20000.00; Employment == nil]"
    );

    let session = risk_engine().fire_rules(&data, initialize_session).unwrap();
    assert_eq!(session.get("riskScore"), Some(&json!("highRiskCategory")));
    assert_eq!(session.get("customerType"), Some(&json!("HighValue")));

    let explanation = &session.explanations()[1];
    assert_eq!(explanation.action_description, "risk level: highRiskCategory");
    assert_eq!(
        explanation.condition_explanation,
        "[AND: Money > 20000.00; Employment == nil]"
    );
}

#[test]
fn test_high_risk_via_membership_branch() {
    let data = user(1000.0, &["Tuco"]);

    let evaluation = high_risk_condition().evaluate(&data).unwrap();
    assert_eq!(evaluation.branch(), Some(1));
    assert_eq!(evaluation.explanation().unwrap(), "Friends in Tuco");

    let session = risk_engine().fire_rules(&data, initialize_session).unwrap();
    assert_eq!(session.get("riskScore"), Some(&json!("highRiskCategory")));
    assert_eq!(session.explanations()[1].condition_explanation, "Friends in Tuco");
}

#[test]
fn test_low_risk_user_keeps_initial_score() {
    let mut data = user(1000.0, &["Saul"]);
    data.employment = Some(EmploymentDetail {
        company: "Vamonos Pest".to_string(),
    });

    let session = risk_engine().fire_rules(&data, initialize_session).unwrap();
    assert_eq!(session.get("riskScore"), Some(&json!("lowRiskCategory")));
    assert_eq!(session.fired_count(), 1);
    assert_eq!(session.explanations()[0].condition_explanation, "High order count");
}

#[test]
fn test_inspect_renders_formatted_explanations() {
    let data = user(500000.0, &[]);
    let session = risk_engine().fire_rules(&data, initialize_session).unwrap();

    let report = session.inspect();
    assert!(report.contains("High order count \n Action-> customer type = HighValue\n"));
    assert!(report.contains(
        "\n[AND: Money > 20000.00; Employment == nil\n] \n Action-> risk level: highRiskCategory\n"
    ));
}

#[test]
fn test_shared_engine_fires_concurrently() {
    let engine = Arc::new(risk_engine());
    let inputs = vec![
        (user(500000.0, &[]), "[AND: Money > 20000.00; Employment == nil]"),
        (user(10.0, &["Tuco"]), "Friends in Tuco"),
        (user(900000.0, &["Tuco"]), "[AND: Money > 20000.00; Employment == nil]"),
    ];

    std::thread::scope(|scope| {
        for (data, expected) in &inputs {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                for _ in 0..50 {
                    let session = engine.fire_rules(data, initialize_session).unwrap();
                    assert_eq!(session.explanations()[1].condition_explanation, *expected);
                }
            });
        }
    });
}

#[test]
fn test_unknown_field_reports_rule() {
    let mut engine = risk_engine();
    engine.add_rule(define_rule(
        greater_than("CreditScore", 700.0),
        update("customerType", "Prime"),
        "customer type = Prime",
    ));

    let err = engine
        .fire_rules(&user(10.0, &[]), initialize_session)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Condition evaluation failed for rule 'customer type = Prime': Field not found: CreditScore"
    );
}
