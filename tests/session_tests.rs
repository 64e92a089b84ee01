use async_trait::async_trait;
use pretty_assertions::assert_eq;
use recipe_cookbook::api_connection::RecipeClient;
use recipe_cookbook::console::ScriptedConsole;
use recipe_cookbook::session::{SessionController, SessionState};
use recipe_cookbook::{RecipeError, RecipeRequest, RecipeResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const RECIPE_TEXT: &str = "Classic Crêpes\n\nServes 4\n1. Whisk egg, flour and milk.\n2. Cook thin.";

enum Behaviour {
    Succeed,
    FailTransport,
    FailRateLimit,
    /// Fails with a transport error on the first call, then succeeds.
    FlakyOnce,
}

struct StubClient {
    behaviour: Behaviour,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubClient {
    fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

fn transport_error() -> RecipeError {
    let err = reqwest::Client::new()
        .get("::not a url::")
        .build()
        .unwrap_err();
    RecipeError::TransportError(err)
}

#[async_trait]
impl RecipeClient for StubClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<RecipeResponse, RecipeError> {
        assert_eq!(api_key, "stub-key");
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.behaviour {
            Behaviour::Succeed => Ok(RecipeResponse::new(RECIPE_TEXT)),
            Behaviour::FailTransport => Err(transport_error()),
            Behaviour::FailRateLimit => Err(RecipeError::RateLimitError("quota".to_string())),
            Behaviour::FlakyOnce if call == 0 => Err(transport_error()),
            Behaviour::FlakyOnce => Ok(RecipeResponse::new(RECIPE_TEXT)),
        }
    }
}

fn controller(behaviour: Behaviour, recipes_dir: &std::path::Path) -> SessionController<StubClient> {
    SessionController::new(StubClient::new(behaviour), "stub-key", recipes_dir)
}

#[tokio::test]
async fn test_successful_session_presents_text_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::new(["egg", "flour", "milk", "", "", "French", "n", "n"]);

    let summary = session.run(&mut console).await.unwrap();

    assert_eq!(summary.generated, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.last_recipe.unwrap().text, RECIPE_TEXT);
    assert!(console.transcript().iter().any(|line| line == RECIPE_TEXT));
    assert_eq!(
        session.history(),
        [
            SessionState::AwaitingInput,
            SessionState::Building,
            SessionState::Requesting,
            SessionState::Presenting,
            SessionState::Terminal,
        ]
    );
    assert_eq!(session.state(), SessionState::Terminal);
    assert_eq!(console.remaining_inputs(), 0);

    let prompt = session.client().last_prompt();
    let order: Vec<usize> = ["egg", "flour", "milk", "French"]
        .iter()
        .map(|word| prompt.find(word).expect("word missing from prompt"))
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_transport_failure_returns_to_awaiting_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::FailTransport, dir.path());
    let mut console = ScriptedConsole::new(["egg", "", "", "", "n"]);

    let summary = session.run(&mut console).await.unwrap();

    assert_eq!(summary.generated, 0);
    assert_eq!(summary.failed, 1);
    assert!(summary.last_recipe.is_none());
    assert_eq!(
        session.history(),
        [
            SessionState::AwaitingInput,
            SessionState::Building,
            SessionState::Requesting,
            SessionState::AwaitingInput,
            SessionState::Terminal,
        ]
    );
    assert!(console.output().contains("Could not reach the recipe service"));
    assert!(!console.output().contains("YOUR GENERATED RECIPE"));
}

#[tokio::test]
async fn test_user_can_retry_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::FlakyOnce, dir.path());
    let mut console = ScriptedConsole::new([
        "rice", "", "", "", "y", // first attempt fails, try again
        "rice", "", "", "", "n", "n",
    ]);

    let summary = session.run(&mut console).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.generated, 1);
    assert_eq!(session.client().calls(), 2);
    assert_eq!(session.state(), SessionState::Terminal);
}

#[tokio::test]
async fn test_rate_limit_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::FailRateLimit, dir.path());
    let mut console = ScriptedConsole::new(["beans", "", "", "", "no"]);

    session.run(&mut console).await.unwrap();

    assert!(console.output().contains("API quota exceeded"));
}

#[tokio::test]
async fn test_blank_ingredients_are_asked_again_without_network_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::new(["", "  ", "egg", "", "", "", "n", "n"]);

    let summary = session.run(&mut console).await.unwrap();

    let reminders = console
        .transcript()
        .iter()
        .filter(|line| line.as_str() == "Please enter at least one ingredient.")
        .count();
    assert_eq!(reminders, 2);
    assert_eq!(summary.generated, 1);
    assert_eq!(session.client().calls(), 1);
}

#[tokio::test]
async fn test_ingredient_lines_are_kept_whole() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::new(["1,5 kg potatoes", "  salt, to taste ", "", "", "", "n", "n"]);

    session.run(&mut console).await.unwrap();

    let prompt = session.client().last_prompt();
    assert!(prompt.contains("1,5 kg potatoes"));
    assert!(prompt.contains("following ingredients: 1,5 kg potatoes, salt, to taste\n"));
}

#[tokio::test]
async fn test_end_of_input_terminates_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::new(Vec::<String>::new());

    let summary = session.run(&mut console).await.unwrap();

    assert_eq!(summary.generated, 0);
    assert_eq!(session.client().calls(), 0);
    assert_eq!(session.history(), [SessionState::AwaitingInput, SessionState::Terminal]);
    assert!(console.output().ends_with("Happy cooking! 🍳✨"));
}

#[tokio::test]
async fn test_saved_recipe_matches_generated_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::new(["egg", "", "vegan", "", "y", "crepes.txt", "n"]);

    session.run(&mut console).await.unwrap();

    let saved = std::fs::read(dir.path().join("crepes.txt")).unwrap();
    assert_eq!(saved, RECIPE_TEXT.as_bytes());
    assert!(console.output().contains("📁 Recipe saved to:"));
    assert!(session.client().last_prompt().contains("Dietary restrictions: vegan"));
}

#[tokio::test]
async fn test_run_once_rejects_empty_request_locally() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::default();
    let request = RecipeRequest::new(Vec::<String>::new(), Some("Italian"), Vec::<String>::new());

    let err = session.run_once(&mut console, &request, None).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RecipeError>(),
        Some(RecipeError::InvalidRequest(_))
    ));
    assert_eq!(session.client().calls(), 0);
    assert_eq!(session.state(), SessionState::Terminal);
}

#[tokio::test]
async fn test_run_once_saves_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::Succeed, dir.path());
    let mut console = ScriptedConsole::default();
    let request = RecipeRequest::new(["egg", "flour", "milk"], Some("French"), ["vegetarian"]);

    let response = session
        .run_once(&mut console, &request, Some("crepes.txt"))
        .await
        .unwrap();

    assert_eq!(response.text, RECIPE_TEXT);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("crepes.txt")).unwrap(),
        RECIPE_TEXT
    );
    assert_eq!(
        session.history(),
        [
            SessionState::AwaitingInput,
            SessionState::Building,
            SessionState::Requesting,
            SessionState::Presenting,
            SessionState::Terminal,
        ]
    );
}

#[tokio::test]
async fn test_run_once_surfaces_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = controller(Behaviour::FailTransport, dir.path());
    let mut console = ScriptedConsole::default();
    let request = RecipeRequest::new(["egg"], None, Vec::<String>::new());

    let err = session.run_once(&mut console, &request, None).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RecipeError>(),
        Some(RecipeError::TransportError(_))
    ));
}
