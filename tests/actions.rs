use std::cell::RefCell;
use std::collections::VecDeque;

use loadform::{
    endpoints, ApiResponse, Backend, DirectoryEntry, FormClient, FormContext, FormError,
    MetricGroup, Notifier, Outcome, RadioGroup, Severity, Toast,
};
use serde_json::{json, Value};

#[derive(Default)]
struct MockBackend {
    replies: RefCell<VecDeque<Value>>,
    requests: RefCell<Vec<(String, Option<Value>)>>,
}

impl MockBackend {
    fn replying(replies: impl IntoIterator<Item = Value>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    fn last(&self) -> (String, Option<Value>) {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

impl Backend for &MockBackend {
    fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, FormError> {
        self.requests
            .borrow_mut()
            .push((path.to_string(), body.cloned()));
        let reply = self.replies.borrow_mut().pop_front().unwrap_or(json!({}));
        ApiResponse::from_body(&reply.to_string())
    }
}

#[derive(Default)]
struct Recorder {
    shown: RefCell<Vec<(Toast, String, Severity)>>,
    deny: bool,
}

impl Notifier for &Recorder {
    fn show(&self, toast: Toast, message: &str, severity: Severity) {
        self.shown
            .borrow_mut()
            .push((toast, message.to_string(), severity));
    }

    fn confirm(&self, _prompt: &str) -> bool {
        !self.deny
    }
}

fn sample_form() -> FormContext {
    let mut form = FormContext::with_load_slots(6);
    form.directories = vec![
        DirectoryEntry::new("sim-a"),
        DirectoryEntry::new("sim-b"),
        DirectoryEntry::new("sim-c"),
    ];
    form.metric_groups = vec![
        MetricGroup::new("blocking", ["bbr", "cbr"]),
        MetricGroup::new("usage", ["util", "frag"]),
    ];
    form.radios.insert(
        "metric-type".into(),
        RadioGroup {
            options: vec!["individual".into(), "grouped".into()],
            selected: Some("individual".into()),
        },
    );
    form.set_field("input-config", "in.json");
    form.set_field("output-config", "out.json");
    form.set_field("previous-metric-type", "individual");
    form
}

#[test]
fn save_config_sends_encoded_loads() {
    let backend = MockBackend::replying([json!({"message": "Configuration saved successfully"})]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    form.directory_mut("sim-b").unwrap().set_checked(true);
    form.directories[1].label = "Baseline".into();
    form.check_metric("util");
    form.loads[1] = "100".into();
    form.loads[2] = "200".into();
    form.loads[5] = "500".into();

    assert_eq!(client.save_config(&form).unwrap(), Outcome::Applied);
    let (path, body) = backend.last();
    assert_eq!(path, endpoints::SAVE_CONFIG);
    assert_eq!(
        body.unwrap(),
        json!({
            "output-config": "out.json",
            "directory-list": ["sim-b"],
            "labels": ["Baseline"],
            "grouped-metrics": {"usage": ["util"]},
            "graph-config": {"loads": ["100", "200", "500"], "load-filter": "1-2,5"},
        })
    );
    let shown = notes.shown.borrow();
    assert_eq!(shown[0].0, Toast::OutputConfig);
    assert_eq!(shown[0].2, Severity::Success);
}

#[test]
fn load_config_reflects_reply_into_form() {
    let backend = MockBackend::replying([json!({
        "config_data": {
            "directories": {"sim-a": "First", "sim-c": "Third"},
            "metrics": {"usage": ["frag"]},
            "graph-config": {"loads": ["10", "30"], "load-filter": "0,4"},
        }
    })]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    form.directory_mut("sim-b").unwrap().set_checked(true);
    form.directories[1].label = "stale".into();

    assert_eq!(client.load_config(&mut form).unwrap(), Outcome::Applied);
    assert_eq!(backend.last().1.unwrap(), json!({"input-config": "in.json"}));

    assert_eq!(form.checked_directories(), vec!["sim-a", "sim-c"]);
    assert_eq!(form.directory_labels(), vec!["First", "Third"]);
    assert!(!form.directories[1].label_enabled);
    assert!(form.directories[1].label.is_empty());

    assert!(form.metric_groups[1].expanded);
    assert!(!form.metric_groups[0].expanded);
    assert_eq!(form.checked_metrics(), vec!["frag"]);

    assert_eq!(form.loads, vec!["10", "", "", "", "30", ""]);
    assert_eq!(
        notes.shown.borrow()[0].1,
        "Configuration loaded successfully!"
    );
}

#[test]
fn backend_error_becomes_warning() {
    let backend = MockBackend::replying([json!({"error": "no such file"})]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);
    let mut form = sample_form();
    form.loads[0] = "keep".into();

    let outcome = client.load_config(&mut form).unwrap();
    assert_eq!(outcome, Outcome::Rejected("no such file".into()));
    assert_eq!(form.loads[0], "keep");
    let shown = notes.shown.borrow();
    assert_eq!(
        shown[0],
        (Toast::InputConfig, "Error: no such file".to_string(), Severity::Warning)
    );
}

#[test]
fn numeric_saved_loads_fill_the_form() {
    let backend = MockBackend::replying([json!({
        "config_data": {
            "directories": {},
            "metrics": {},
            "graph-config": {"loads": [100, 200]},
        }
    })]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);
    let mut form = sample_form();

    assert_eq!(client.load_config(&mut form).unwrap(), Outcome::Applied);
    assert_eq!(form.loads, vec!["100", "200", "", "", "", ""]);
    assert_eq!(notes.shown.borrow()[0].2, Severity::Success);
}

#[test]
fn structured_backend_error_is_not_success() {
    let backend = MockBackend::replying([json!({"error": {"detail": "boom"}})]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);
    let mut form = sample_form();

    let outcome = client.load_config(&mut form).unwrap();
    assert_eq!(outcome, Outcome::Rejected(r#"{"detail":"boom"}"#.into()));
    let shown = notes.shown.borrow();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, Toast::InputConfig);
    assert_eq!(shown[0].2, Severity::Warning);
}

#[test]
fn ill_typed_config_reply_is_an_error() {
    let backend = MockBackend::replying([json!({"config_data": {"metrics": "all"}})]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);
    let mut form = sample_form();

    let err = client.load_config(&mut form).unwrap_err();
    assert!(matches!(err, FormError::Json(_)));
    assert!(notes.shown.borrow().is_empty());
}

#[test]
fn generate_graphs_uses_custom_load_map() {
    let backend = MockBackend::replying([json!({"message": "Graphs generated"})]);
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    form.set_toggle("use-custom-loads", true);
    form.set_field("load-points-filter", "ignored");
    form.set_field("graph-type", "line");
    form.loads[3] = "42".into();

    assert_eq!(client.generate_graphs(&form).unwrap(), Outcome::Applied);
    let body = backend.last().1.unwrap();
    assert_eq!(body["loads"], json!({"3": "42"}));
    assert_eq!(body["load-points-filter"], json!(""));
    assert_eq!(body["graph-type"], json!("line"));
    assert_eq!(body["title"], json!(""));
}

#[test]
fn invalid_load_points_filter_is_not_sent() {
    let backend = MockBackend::default();
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    form.set_field("load-points-filter", "2-9");

    let outcome = client.export_results(&form).unwrap();
    assert!(matches!(outcome, Outcome::Rejected(_)));
    assert!(backend.requests.borrow().is_empty());
    assert_eq!(notes.shown.borrow()[0].0, Toast::ExportResults);

    form.set_field("load-points-filter", "0,2-");
    assert_eq!(client.export_results(&form).unwrap(), Outcome::Applied);
    let body = backend.last().1.unwrap();
    assert_eq!(body["load-points-filter"], json!("0,2-"));
    assert_eq!(body["loads"], json!({}));
}

#[test]
fn metric_type_only_sent_when_changed() {
    let backend = MockBackend::default();
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    assert_eq!(client.update_metric_type(&mut form).unwrap(), Outcome::Unchanged);
    assert!(backend.requests.borrow().is_empty());

    form.select_radio("metric-type", "grouped").unwrap();
    assert_eq!(client.update_metric_type(&mut form).unwrap(), Outcome::Reload);
    assert_eq!(
        backend.last(),
        (
            endpoints::UPDATE_METRIC_TYPE.to_string(),
            Some(json!({"metric-type": "grouped"}))
        )
    );
    assert_eq!(form.field("previous-metric-type").unwrap(), "grouped");
}

#[test]
fn clear_session_requires_confirmation() {
    let backend = MockBackend::replying([json!({"message": "Session cleared"})]);
    let declined = Recorder {
        deny: true,
        ..Recorder::default()
    };
    let client = FormClient::new(&backend, &declined);
    assert_eq!(client.clear_session().unwrap(), Outcome::Unchanged);
    assert!(backend.requests.borrow().is_empty());

    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);
    assert_eq!(client.clear_session().unwrap(), Outcome::Reload);
    assert_eq!(backend.last(), (endpoints::CLEAR_SESSION.to_string(), None));
}

#[test]
fn custom_loads_toggle_is_posted() {
    let backend = MockBackend::default();
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let mut form = sample_form();
    form.set_toggle("use-custom-loads", true);
    assert_eq!(client.update_use_custom_loads(&form).unwrap(), Outcome::Reload);
    assert_eq!(
        backend.last().1.unwrap(),
        json!({"use-custom-loads": true})
    );
}

#[test]
fn missing_field_is_a_hard_error() {
    let backend = MockBackend::default();
    let notes = Recorder::default();
    let client = FormClient::new(&backend, &notes);

    let form = FormContext::default();
    assert!(matches!(
        client.load_directory(&form),
        Err(FormError::MissingElement(id)) if id == "base-directory"
    ));
}
