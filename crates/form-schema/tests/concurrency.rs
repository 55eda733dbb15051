//! Registration and validation from many threads at once.

use std::sync::Barrier;
use std::time::Duration;

use form_config::ValidationConfig;
use form_schema::{
    Form, FormBuilder, FormId, FormInstance, FormRegistry, Input, Rule, SchemaError,
};
use pretty_assertions::assert_eq;
use serde::Serialize;

const THREADS: usize = 8;

/// Declares slowly so concurrent registrations overlap.
struct Slow;

impl Form for Slow {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        std::thread::sleep(Duration::from_millis(5));
        form.field("first", Input::text())
            .validate(Rule::string().required());
        form.field("second", Input::number());
        Ok(())
    }
}

#[test]
fn concurrent_registration_installs_fields_once() {
    for _ in 0..50 {
        let registry = FormRegistry::new();
        let barrier = Barrier::new(THREADS);
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    barrier.wait();
                    registry.register_form::<Slow>().unwrap();
                });
            }
        });

        let form = FormId::of::<Slow>();
        assert_eq!(registry.field_count(form), 2);
        assert_eq!(registry.ui_schema(form).unwrap().len(), 2);
        assert_eq!(
            registry.validation_schema(form).unwrap()["required"],
            serde_json::json!(["first"])
        );
    }
}

#[test]
fn concurrent_queries_agree() {
    let registry = FormRegistry::new();
    let barrier = Barrier::new(THREADS);
    let schemas: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    (
                        registry.ui_schema_of::<Slow>().unwrap(),
                        registry.validation_schema_of::<Slow>().unwrap(),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for schema in &schemas[1..] {
        assert_eq!(schema, &schemas[0]);
    }
}

#[derive(Serialize)]
struct Ticket {
    title: Option<String>,
    seat: Option<i64>,
}

impl Form for Ticket {
    fn declare(form: &mut FormBuilder<'_>) -> Result<(), SchemaError> {
        form.field("title", Input::text().required())
            .validate(Rule::string().required());
        form.field("seat", Input::number())
            .validate(Rule::integer().minimum(1));
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_validations_are_independent() {
    let config = ValidationConfig::default();
    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..32_i64 {
        let config = config.clone();
        tasks.spawn(async move {
            let ticket = Ticket {
                title: (n % 2 == 0).then(|| format!("show {n}")),
                seat: Some(n),
            };
            let result = ticket.validate(FormRegistry::global(), &config).await;
            (n, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (n, result) = joined.unwrap();
        match result {
            Ok(value) => {
                assert!(n % 2 == 0 && n >= 1, "{n} should have been rejected");
                assert_eq!(value["seat"], n);
            }
            Err(err) => {
                assert!(n % 2 == 1 || n == 0, "{n} should have passed: {err}");
                let expected = usize::from(n % 2 == 1) + usize::from(n == 0);
                assert_eq!(err.violations().len(), expected);
            }
        }
    }
}
