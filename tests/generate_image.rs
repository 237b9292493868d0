use async_trait::async_trait;
use lora_imagegen::{
    action::generate_image::{ACTION_NAME, COMPLETED_TEXT, FAILURE_TEXT, IMAGE_MODEL},
    Action, ActionConfig, Content, GenerateImageAction, HandlerCallback, ImageGenError,
    ImageGenerationRequest, ImageGenerationResult, ImageGenerator, MapSettings, Memory,
    TextGenerationRequest, TextGenerator, PNG_CONTENT_TYPE,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROMPT: &str = "a paper boat drifting on a rain puddle, soft morning light";
const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

struct FixedText(Result<String, String>);

#[async_trait]
impl TextGenerator for FixedText {
    async fn generate_text(&self, _request: TextGenerationRequest) -> lora_imagegen::Result<String> {
        self.0.clone().map_err(ImageGenError::AwsError)
    }
}

struct FixedImages {
    outcome: Result<ImageGenerationResult, String>,
    seen: Mutex<Vec<ImageGenerationRequest>>,
}

impl FixedImages {
    fn returning(data: Vec<&str>) -> Arc<Self> {
        Self::with(Ok(ImageGenerationResult::success(
            data.into_iter().map(String::from).collect(),
        )))
    }

    fn with(outcome: Result<ImageGenerationResult, String>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageGenerator for FixedImages {
    async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> lora_imagegen::Result<ImageGenerationResult> {
        self.seen.lock().unwrap().push(request);
        self.outcome.clone().map_err(ImageGenError::ResponseError)
    }
}

#[derive(Default)]
struct RecordingCallback {
    messages: Mutex<Vec<Content>>,
}

impl RecordingCallback {
    fn messages(&self) -> Vec<Content> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl HandlerCallback for RecordingCallback {
    async fn call(&self, content: Content) -> lora_imagegen::Result<()> {
        self.messages.lock().unwrap().push(content);
        Ok(())
    }
}

fn settings() -> MapSettings {
    MapSettings::new().with("IMAGE_API_KEY", "test-key")
}

fn action(
    text: Result<&str, &str>,
    images: Arc<FixedImages>,
    output_dir: &Path,
) -> GenerateImageAction {
    let text = FixedText(text.map(String::from).map_err(String::from));
    GenerateImageAction::new(
        Arc::new(text),
        images,
        ActionConfig::new().with_output_dir(output_dir),
    )
}

#[tokio::test]
async fn test_validate_requires_credential() {
    let dir = tempfile::tempdir().unwrap();
    let action = action(Ok(PROMPT), FixedImages::returning(vec![]), dir.path());
    let message = Memory::new("draw a boat");

    assert!(!action.validate(&MapSettings::new(), &message).await);
    assert!(
        !action
            .validate(&MapSettings::new().with("IMAGE_API_KEY", "  "), &message)
            .await
    );
    assert!(action.validate(&settings(), &message).await);
}

#[tokio::test]
async fn test_successful_generation_forwards_url() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::returning(vec!["https://cdn.example.com/boat.png"]);
    let action = action(Ok(PROMPT), images.clone(), dir.path());
    let callback = RecordingCallback::default();

    let ok = action
        .handler(&settings(), &Memory::new("draw a boat in the rain"), &callback)
        .await;
    assert!(ok);

    let messages = callback.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].attachments.is_empty());
    assert!(messages[1].text.contains(PROMPT));

    let done = &messages[2];
    assert_eq!(done.text, COMPLETED_TEXT);
    assert_eq!(done.action.as_deref(), Some(ACTION_NAME));
    assert_eq!(done.attachments.len(), 1);
    assert_eq!(done.attachments[0].url, "https://cdn.example.com/boat.png");
    assert_eq!(done.attachments[0].description, PROMPT);
    assert_eq!(done.attachments[0].content_type, PNG_CONTENT_TYPE);

    let seen = images.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].prompt, PROMPT);
    assert_eq!(seen[0].model_id, IMAGE_MODEL);
    assert_eq!((seen[0].width, seen[0].height), (1024, 1024));

    // Remote results are not written to disk unless asked for.
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_base64_result_is_saved_locally() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("images").join("lora");
    let payload = format!("data:image/png;base64,{}", PNG_B64);
    let action = action(
        Ok(PROMPT),
        FixedImages::returning(vec![payload.as_str()]),
        &output,
    );
    let callback = RecordingCallback::default();

    assert!(
        action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );

    let messages = callback.messages();
    let attachment = &messages.last().unwrap().attachments[0];
    let saved = Path::new(&attachment.url);
    assert!(saved.starts_with(&output));
    assert_eq!(saved.extension().unwrap(), "png");
    assert!(std::fs::metadata(saved).unwrap().len() > 0);
    assert_eq!(attachment.description, PROMPT);
}

#[tokio::test]
async fn test_remote_result_can_be_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote-png".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/boat.png", server.uri());
    let action = GenerateImageAction::new(
        Arc::new(FixedText(Ok(PROMPT.to_string()))),
        FixedImages::returning(vec![url.as_str()]),
        ActionConfig::new()
            .with_output_dir(dir.path())
            .with_persist_remote_images(true),
    );
    let callback = RecordingCallback::default();

    assert!(
        action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );
    assert_eq!(callback.messages()[2].attachments[0].url, url);

    let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(saved.len(), 1);
    let path = saved[0].as_ref().unwrap().path();
    assert_eq!(std::fs::read(path).unwrap(), b"remote-png");
}

#[tokio::test]
async fn test_empty_result_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let action = action(Ok(PROMPT), FixedImages::returning(vec![]), dir.path());
    let callback = RecordingCallback::default();

    let ok = action
        .handler(&settings(), &Memory::new("draw a boat"), &callback)
        .await;
    assert!(!ok);

    let messages = callback.messages();
    let last = messages.last().unwrap();
    assert_eq!(last.text, FAILURE_TEXT);
    assert!(last.attachments.is_empty());
}

#[tokio::test]
async fn test_unsuccessful_result_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::with(Ok(ImageGenerationResult::failure("rate limited")));
    let action = action(Ok(PROMPT), images, dir.path());
    let callback = RecordingCallback::default();

    assert!(
        !action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );
    assert_eq!(callback.messages().last().unwrap().text, FAILURE_TEXT);
}

#[tokio::test]
async fn test_image_service_error_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::with(Err("connection reset".to_string()));
    let action = action(Ok(PROMPT), images, dir.path());
    let callback = RecordingCallback::default();

    assert!(
        !action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );

    let messages = callback.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, FAILURE_TEXT);
}

#[tokio::test]
async fn test_prompt_failure_skips_image_call() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::returning(vec!["https://cdn.example.com/boat.png"]);
    let action = action(Err("model unavailable"), images.clone(), dir.path());
    let callback = RecordingCallback::default();

    assert!(
        !action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );

    let messages = callback.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, FAILURE_TEXT);
    assert!(images.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handler_without_credential_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::returning(vec!["https://cdn.example.com/boat.png"]);
    let action = action(Ok(PROMPT), images.clone(), dir.path());
    let callback = RecordingCallback::default();

    assert!(
        !action
            .handler(&MapSettings::new(), &Memory::new("draw a boat"), &callback)
            .await
    );
    assert_eq!(callback.messages(), vec![Content::text(FAILURE_TEXT)]);
    assert!(images.seen.lock().unwrap().is_empty());
}

#[test]
fn test_action_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let action = action(Ok(PROMPT), FixedImages::returning(vec![]), dir.path());

    assert_eq!(action.name(), "GENERATE_IMAGE");
    assert!(action.similes().contains(&"DRAW"));
    assert!(!action.description().is_empty());
    for example in action.examples() {
        assert_eq!(example.len(), 2);
        assert_eq!(example[1].content.action.as_deref(), Some(ACTION_NAME));
    }
}

struct FailingCallback {
    attempts: Mutex<usize>,
}

#[async_trait]
impl HandlerCallback for FailingCallback {
    async fn call(&self, _content: Content) -> lora_imagegen::Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(ImageGenError::RequestError("host went away".into()))
    }
}

#[tokio::test]
async fn test_callback_errors_do_not_abort_handler() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::returning(vec!["https://cdn.example.com/boat.png"]);
    let action = action(Ok(PROMPT), images.clone(), dir.path());
    let callback = FailingCallback {
        attempts: Mutex::new(0),
    };

    let ok = action
        .handler(&settings(), &Memory::new("draw a boat"), &callback)
        .await;

    assert!(ok);
    assert_eq!(*callback.attempts.lock().unwrap(), 3);
    assert_eq!(images.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_remote_copy_still_forwards_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("{}/gone.png", server.uri());
    let action = GenerateImageAction::new(
        Arc::new(FixedText(Ok(PROMPT.to_string()))),
        FixedImages::returning(vec![url.as_str()]),
        ActionConfig::new()
            .with_output_dir(dir.path())
            .with_persist_remote_images(true),
    );
    let callback = RecordingCallback::default();

    assert!(
        action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );

    let messages = callback.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].attachments.len(), 1);
    assert_eq!(messages[2].attachments[0].url, url);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_uppercase_scheme_is_forwarded() {
    let dir = tempfile::tempdir().unwrap();
    let images = FixedImages::returning(vec!["HTTPS://CDN.EXAMPLE.COM/BOAT.PNG"]);
    let action = action(Ok(PROMPT), images, dir.path());
    let callback = RecordingCallback::default();

    assert!(
        action
            .handler(&settings(), &Memory::new("draw a boat"), &callback)
            .await
    );
    assert_eq!(
        callback.messages()[2].attachments[0].url,
        "HTTPS://CDN.EXAMPLE.COM/BOAT.PNG"
    );
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
