use workflow_store::{GenerationMode, SearchFilter, WorkflowLibrary};
use waymark_core_types::{Action, WorkflowDefinition, WorkflowId};

fn workflow(name: &str, description: &str, tags: &[&str]) -> WorkflowDefinition {
    let mut workflow = WorkflowDefinition::new(name, description)
        .with_step(Action::navigation("https://example.com/{page}"));
    for tag in tags {
        workflow = workflow.with_tag(*tag);
    }
    workflow
}

#[test]
fn library_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let mut library = WorkflowLibrary::open(dir.path()).unwrap();
        library
            .save(
                &workflow("Checkout Flow", "Buy the first item", &["shop"]),
                GenerationMode::Ai,
                Some("buy something".into()),
            )
            .unwrap()
    };

    let library = WorkflowLibrary::open(dir.path()).unwrap();
    assert_eq!(library.list().len(), 1);
    let entry = &library.list()[0];
    assert_eq!(entry, &saved);
    assert_eq!(entry.original_task.as_deref(), Some("buy something"));

    let loaded = library.get(&saved.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Checkout Flow");
    assert!(dir.path().join("definitions/checkout_flow.json").is_file());

    let by_name = library.get_by_name("CHECKOUT flow").unwrap().unwrap();
    assert_eq!(by_name, loaded);
    assert!(library.get_by_name("nope").unwrap().is_none());
    assert!(library.get(&WorkflowId::from("nope")).unwrap().is_none());
}

#[test]
fn search_filters_combine() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = WorkflowLibrary::open(dir.path()).unwrap();
    library
        .save(&workflow("Login", "Sign in", &["auth"]), GenerationMode::Manual, None)
        .unwrap();
    library
        .save(&workflow("Logout", "Sign out", &["auth", "cleanup"]), GenerationMode::Ai, None)
        .unwrap();
    library
        .save(&workflow("Search", "Find products", &[]), GenerationMode::Manual, None)
        .unwrap();

    let names = |filter: &SearchFilter| -> Vec<String> {
        library.search(filter).into_iter().map(|m| m.name.clone()).collect()
    };

    assert_eq!(names(&SearchFilter::default()).len(), 3);
    assert_eq!(
        names(&SearchFilter {
            query: Some("sign".into()),
            ..SearchFilter::default()
        }),
        vec!["Login", "Logout"]
    );
    assert_eq!(
        names(&SearchFilter {
            tags: vec!["CLEANUP".into()],
            ..SearchFilter::default()
        }),
        vec!["Logout"]
    );
    assert_eq!(
        names(&SearchFilter {
            query: Some("o".into()),
            generation_mode: Some(GenerationMode::Manual),
            ..SearchFilter::default()
        }),
        vec!["Login", "Search"]
    );
}

#[test]
fn update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = WorkflowLibrary::open(dir.path()).unwrap();
    let saved = library
        .save(&workflow("Report", "Weekly report", &[]), GenerationMode::Manual, None)
        .unwrap();

    let mut revised = workflow("Report", "Monthly report", &["finance"]);
    revised.version = "2.0".into();
    let updated = library.update(&saved.id, &revised).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.version, "2.0");
    assert_eq!(updated.tags, vec!["finance".to_string()]);
    assert!(updated.updated_at >= saved.updated_at);
    assert_eq!(
        library.get(&saved.id).unwrap().unwrap().description,
        "Monthly report"
    );

    assert!(library.delete(&saved.id).unwrap());
    assert!(!library.delete(&saved.id).unwrap());
    assert!(!dir.path().join("definitions/report.json").exists());

    let reopened = WorkflowLibrary::open(dir.path()).unwrap();
    assert!(reopened.list().is_empty());
}
