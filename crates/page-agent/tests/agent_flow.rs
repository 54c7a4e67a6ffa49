//! Agent loop behavior against a scripted page.

use std::sync::Arc;
use std::time::Duration;

use draft_core::{
    AgentRequest, AgentResponse, DraftRequest, Envelope, MemorySettingsStore, Settings,
};
use page_agent::{ControlState, PageAgent, PageEvent, ScriptedPage, ToastKind};
use tokio::sync::mpsc;
use tokio::time;

const COMPOSE: &str = "div[aria-label='Message Body']";
const MESSAGE: &str = "div.a3s.aiL";

struct Harness {
    events: mpsc::Sender<PageEvent>,
    requests: mpsc::Receiver<Envelope>,
}

fn settings_with_key() -> Settings {
    let mut settings = Settings::default();
    settings.api_key = "sk-test".to_string();
    settings.tone = "friendly".to_string();
    settings
}

async fn start(page: Arc<ScriptedPage>, settings: Settings) -> Harness {
    let (request_tx, request_rx) = mpsc::channel(8);
    let (event_tx, event_rx) = mpsc::channel(8);

    let agent = PageAgent::new(
        Arc::clone(&page),
        Arc::new(MemorySettingsStore::with_settings(settings)),
        request_tx,
    );
    tokio::spawn(agent.run(event_rx));

    Harness {
        events: event_tx,
        requests: request_rx,
    }
}

/// Poll until the condition holds. Time is paused, so sleeps advance the
/// clock instead of wasting wall time.
async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

fn expect_draft(envelope: &Envelope) -> &DraftRequest {
    match &envelope.request {
        AgentRequest::Draft(request) => request,
        other => panic!("expected a draft request, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_click_round_trip_inserts_draft() {
    let page = Arc::new(ScriptedPage::new());
    let compose = page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>When is the event?</p>", true);

    let mut harness = start(Arc::clone(&page), settings_with_key()).await;

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Idle, _)))
    })
    .await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();

    let envelope = harness.requests.recv().await.unwrap();
    let request = expect_draft(&envelope);
    assert_eq!(request.email_context, "When is the event?");
    assert_eq!(request.tone, "friendly");
    assert_eq!(request.thread_id, None);

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Busy, _)))
    })
    .await;

    envelope
        .reply
        .send(AgentResponse::Draft {
            draft: "It's in April.".to_string(),
        })
        .await
        .unwrap();

    eventually(|| !page.insertions().is_empty()).await;

    assert_eq!(page.cleared(), vec![compose]);
    assert_eq!(page.insertions(), vec![(compose, "It's in April.".to_string())]);
    assert!(matches!(page.last_control(), Some((ControlState::Idle, _))));

    let toasts = page.toast_messages();
    assert_eq!(toasts.last().map(String::as_str), Some("Draft inserted"));
}

#[tokio::test(start_paused = true)]
async fn test_missing_key_blocks_dispatch() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let mut harness = start(Arc::clone(&page), Settings::default()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();

    eventually(|| !page.toast_messages().is_empty()).await;
    assert_eq!(page.toast_messages(), vec!["API key not configured"]);
    assert!(harness.requests.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_missing_tone_blocks_dispatch() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let mut settings = settings_with_key();
    settings.tone = String::new();

    let mut harness = start(Arc::clone(&page), settings).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();

    eventually(|| !page.toast_messages().is_empty()).await;
    assert_eq!(page.toast_messages(), vec!["Tone is not configured"]);
    assert!(harness.requests.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_missing_compose_surface_toast() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let harness = start(Arc::clone(&page), settings_with_key()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();

    eventually(|| !page.toast_messages().is_empty()).await;
    assert_eq!(page.toast_messages(), vec!["No compose area found"]);
}

#[tokio::test(start_paused = true)]
async fn test_second_click_while_in_flight_is_rejected() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let mut harness = start(Arc::clone(&page), settings_with_key()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();
    let envelope = harness.requests.recv().await.unwrap();

    harness.events.send(PageEvent::ActionClicked).await.unwrap();

    eventually(|| !page.toasts().is_empty()).await;
    let toasts = page.toasts();
    let toast = toasts[0].as_ref().unwrap();
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.message, "Already processing a request");
    assert!(harness.requests.try_recv().is_err());

    envelope
        .reply
        .send(AgentResponse::Draft {
            draft: "late".to_string(),
        })
        .await
        .unwrap();
    eventually(|| !page.insertions().is_empty()).await;
}

#[tokio::test(start_paused = true)]
async fn test_surface_removal_hides_control() {
    let page = Arc::new(ScriptedPage::new());
    let compose = page.add_element(COMPOSE, "", true);

    let harness = start(Arc::clone(&page), settings_with_key()).await;

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Idle, _)))
    })
    .await;

    page.remove_element(compose);
    harness.events.send(PageEvent::Mutation).await.unwrap();

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Hidden, _)))
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_navigation_tears_down_and_rebuilds() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);

    let harness = start(Arc::clone(&page), settings_with_key()).await;

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Idle, _)))
    })
    .await;

    page.set_location("https://mail.example.com/#sent/18c2f3a");
    harness.events.send(PageEvent::Mutation).await.unwrap();

    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Hidden, _)))
    })
    .await;

    // After the settle delay the agent rebuilds against the new view,
    // where the compose surface still exists.
    eventually(|| {
        matches!(page.last_control(), Some((ControlState::Idle, _)))
    })
    .await;

    let states: Vec<_> = page.control_renders().iter().map(|(s, _)| *s).collect();
    assert_eq!(
        states,
        vec![ControlState::Idle, ControlState::Hidden, ControlState::Idle]
    );
}

#[tokio::test(start_paused = true)]
async fn test_insertion_falls_back_to_append() {
    let page = Arc::new(ScriptedPage::new());
    let compose = page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);
    page.set_exec_insert_ok(false);
    page.set_selection_insert_ok(false);

    let mut harness = start(Arc::clone(&page), settings_with_key()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();
    let envelope = harness.requests.recv().await.unwrap();
    envelope
        .reply
        .send(AgentResponse::Draft {
            draft: "fallback path".to_string(),
        })
        .await
        .unwrap();

    eventually(|| !page.insertions().is_empty()).await;
    assert_eq!(
        page.insertions(),
        vec![(compose, "fallback path".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_draft_error_shows_toast_and_restores_control() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let mut harness = start(Arc::clone(&page), settings_with_key()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();
    let envelope = harness.requests.recv().await.unwrap();
    envelope
        .reply
        .send(AgentResponse::DraftError {
            error: "completion timed out after 30s".to_string(),
        })
        .await
        .unwrap();

    eventually(|| !page.toast_messages().is_empty()).await;
    assert_eq!(
        page.toast_messages(),
        vec!["completion timed out after 30s"]
    );
    assert!(page.insertions().is_empty());
    assert!(matches!(page.last_control(), Some((ControlState::Idle, _))));
}

#[tokio::test(start_paused = true)]
async fn test_narrow_viewport_uses_shifted_placement() {
    let page = Arc::new(ScriptedPage::new());
    page.set_viewport(480, 800);
    page.add_element(COMPOSE, "", true);

    let _harness = start(Arc::clone(&page), settings_with_key()).await;

    eventually(|| page.last_control().is_some()).await;
    let (_, placement) = page.last_control().unwrap();
    assert_eq!(placement.right, 16);
    assert_eq!(placement.bottom, 88);
}

#[tokio::test(start_paused = true)]
async fn test_toast_clears_after_its_duration() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(MESSAGE, "<p>hi</p>", true);

    let harness = start(Arc::clone(&page), settings_with_key()).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();
    eventually(|| !page.toasts().is_empty()).await;

    eventually(|| page.toasts().last() == Some(&None)).await;
}

#[tokio::test(start_paused = true)]
async fn test_thread_id_attached_when_rich_context_enabled() {
    let page = Arc::new(ScriptedPage::new());
    page.add_element(COMPOSE, "", true);
    page.add_element(MESSAGE, "<p>hi</p>", true);
    let marker = page.add_element("[data-legacy-thread-id]", "", true);
    page.set_attribute(marker, "data-legacy-thread-id", "18c2f3a");

    let mut settings = settings_with_key();
    settings.use_rich_context_api = true;

    let mut harness = start(Arc::clone(&page), settings).await;

    harness.events.send(PageEvent::ActionClicked).await.unwrap();
    let envelope = harness.requests.recv().await.unwrap();
    let request = expect_draft(&envelope);
    assert!(request.use_rich_context_api);
    assert_eq!(request.thread_id.as_deref(), Some("18c2f3a"));
}
