use async_trait::async_trait;
use serde_json::json;

use super::{GenerationBackend, GenerationError, GenerationPurpose, GenerationRequest};

/// Offline backend with canned answers.
///
/// Disambiguation is reported as unavailable so that callers take their
/// deterministic popularity fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        match request.purpose {
            GenerationPurpose::Disambiguation => Err(GenerationError::Unavailable(
                "stub backend does not judge candidates".to_string(),
            )),
            GenerationPurpose::Recommendation => Ok(json!({
                "title": "Spirited Away (2001)",
                "type": "Anime",
                "genre": "Animation/Fantasy",
                "synopsis": "Ten-year-old Chihiro wanders into a hidden world of spirits and must work in a bathhouse for the gods to free her parents.",
                "probabilities": { "loved": 85, "liked": 10, "meh": 4, "disliked": 1 },
                "analysis": "Sample data. You rate layered stories with striking visuals highly, and this Studio Ghibli classic fits that profile."
            })
            .to_string()),
            GenerationPurpose::Prediction => Ok(json!({
                "prediction": "Good chance you will LIKE it.",
                "reason": "Sample data. The title leans on science fiction, which you have enjoyed before."
            })
            .to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
