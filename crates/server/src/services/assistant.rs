//! Styling, repair and verification assistant built on Gemini.
//!
//! Every operation is a single pass-through call. Structured operations ask
//! for JSON matching a schema and return `None` when the call or the parse
//! fails; proof verification falls back to a negative verdict instead.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

use ecothread_core::ActionCategory;

use crate::config::GeminiConfig;
use crate::gemini::types::{
    Content, GenerateContentRequest, GenerationConfig, GoogleMaps, LatLng, Part, RetrievalConfig,
    Role, Tool, ToolConfig,
};
use crate::gemini::{GeminiClient, GeminiError};
use crate::models::ChatMessage;
use crate::models::assistant::{
    ProofVerdict, RepairGuide, RepairShop, RepairShopResults, ShopSearch, StylingTip,
    UpcyclingProject,
};

/// Persona for the conversational assistant.
pub const SYSTEM_INSTRUCTION: &str = "You are the ECOthread Loop Assistant. Your goal is to help users with:
1. Circular Fashion: Explain what it is and why it matters.
2. Styling (Wear): Provide inspiration for re-wearing clothes.
3. Repairing (Care): Give advice on mending and fabric care.
4. Marketplace (Share): Explain how swapping and selling works on the platform.
5. Business Queries: Answer questions about ECOthread's mission to reduce fast fashion waste.
Be helpful, professional, and encouraging. Keep responses relatively concise but informative.";

/// Opening line shown before the first exchange. Never sent to the model.
pub const CHAT_GREETING: &str = "Hi! I'm Loomi. I can help you fix a snag, find a shop, or style a vintage piece. What's on your mind?";

/// Reply used when the conversation call fails.
pub const CHAT_FALLBACK: &str = "Oops! My threads got tangled. Try again?";

/// Reason given when verification itself fails.
pub const VERIFY_FALLBACK_REASON: &str = "AI verification failed. Please try again.";

const SHOP_QUERY_BASE: &str = "Find clothing repair shops, tailors, thrift shops, fabric stores, and sustainable clothing stores";
const DEFAULT_SHOP_TITLE: &str = "Local Shop";
const DEFAULT_SHOP_URI: &str = "#";

/// The image could not be used.
#[derive(Debug, thiserror::Error)]
#[error("image is not valid base64 data")]
pub struct InvalidImage;

/// Base64 payload of an image, without any `data:...;base64,` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData(String);

impl ImageData {
    /// Strip a data-URL prefix and check the remainder decodes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidImage`] when the payload is empty or not base64.
    pub fn from_upload(image: &str) -> Result<Self, InvalidImage> {
        let data = strip_data_url(image).trim();
        if data.is_empty() || STANDARD.decode(data).is_err() {
            return Err(InvalidImage);
        }
        Ok(Self(data.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Text after the data-URL header, or the whole input when there is none.
#[must_use]
pub fn strip_data_url(image: &str) -> &str {
    image
        .split(',')
        .nth(1)
        .filter(|data| !data.is_empty())
        .unwrap_or(image)
}

/// Assistant operations bound to one client and model configuration.
pub struct Assistant<'a> {
    client: &'a GeminiClient,
    config: &'a GeminiConfig,
}

impl<'a> Assistant<'a> {
    #[must_use]
    pub const fn new(client: &'a GeminiClient, config: &'a GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Continue the conversation. Streamed chunks are joined in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails, any chunk fails, or the model
    /// produced no text at all.
    #[instrument(skip(self, history, message), fields(turns = history.len()))]
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, GeminiError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content::new(m.role, vec![Part::text(m.text.clone())]))
            .collect();
        contents.push(Content::new(Role::User, vec![Part::text(message)]));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(SYSTEM_INSTRUCTION)),
            ..Default::default()
        };

        let stream = self.client.generate_stream(&self.config.model, &request).await?;
        let mut stream = std::pin::pin!(stream);
        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            if let Some(text) = chunk?.text() {
                reply.push_str(&text);
            }
        }

        if reply.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(reply)
    }

    /// Three outfit combinations for a garment.
    #[instrument(skip(self))]
    pub async fn outfit_suggestions(&self, description: &str) -> Option<Vec<StylingTip>> {
        let contents = vec![Content::user_text(outfit_prompt(description))];
        self.generate_json(contents, outfit_schema())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error generating outfits"))
            .ok()
    }

    /// Three-step repair guide plus a tutorial search query.
    #[instrument(skip(self))]
    pub async fn repair_advice(&self, issue: &str, fabric: &str) -> Option<RepairGuide> {
        let contents = vec![Content::user_text(repair_prompt(issue, fabric))];
        self.generate_json(contents, repair_schema())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error generating repair advice"))
            .ok()
    }

    /// DIY upcycling projects for the garment in a photo.
    #[instrument(skip(self, image))]
    pub async fn upcycling_ideas(&self, image: &ImageData) -> Option<Vec<UpcyclingProject>> {
        let contents = vec![Content::new(
            Role::User,
            vec![Part::jpeg(image.as_str()), Part::text(UPCYCLE_PROMPT)],
        )];
        self.generate_json(contents, upcycle_schema())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error generating upcycling ideas"))
            .ok()
    }

    /// Check whether a photo proves the claimed action.
    #[instrument(skip(self, image))]
    pub async fn verify_action_proof(&self, image: &ImageData, action: ActionCategory) -> ProofVerdict {
        let contents = vec![Content::new(
            Role::User,
            vec![Part::jpeg(image.as_str()), Part::text(verify_prompt(action))],
        )];
        self.generate_json(contents, verdict_schema())
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Error verifying proof");
                ProofVerdict {
                    valid: false,
                    reason: VERIFY_FALLBACK_REASON.to_string(),
                }
            })
    }

    /// Maps-grounded search for nearby repair and thrift shops.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the call.
    #[instrument(skip(self))]
    pub async fn find_local_repair_shops(
        &self,
        search: &ShopSearch,
    ) -> Result<RepairShopResults, GeminiError> {
        let lat_lng = match (search.latitude, search.longitude) {
            (Some(latitude), Some(longitude)) => Some(LatLng { latitude, longitude }),
            _ => None,
        };
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(shop_query(search))],
            tools: vec![Tool {
                google_maps: GoogleMaps::default(),
            }],
            tool_config: Some(ToolConfig {
                retrieval_config: RetrievalConfig { lat_lng },
            }),
            ..Default::default()
        };

        let response = self
            .client
            .generate(&self.config.maps_model, &request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error finding repair shops"))?;

        let locations = response
            .grounding_chunks()
            .iter()
            .filter_map(|chunk| chunk.maps.as_ref())
            .map(|maps| RepairShop {
                title: maps
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_SHOP_TITLE.to_string()),
                uri: maps
                    .uri
                    .clone()
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| DEFAULT_SHOP_URI.to_string()),
                snippet: maps.snippet(),
            })
            .collect();

        Ok(RepairShopResults {
            text: response.text().unwrap_or_default(),
            locations,
        })
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        contents: Vec<Content>,
        schema: Value,
    ) -> Result<T, GeminiError> {
        let request = GenerateContentRequest {
            contents,
            generation_config: Some(GenerationConfig::json(schema)),
            ..Default::default()
        };
        let response = self.client.generate(&self.config.model, &request).await?;
        let text = response.text().ok_or(GeminiError::EmptyResponse)?;
        serde_json::from_str(&text)
            .map_err(|e| GeminiError::Parse(format!("model returned unexpected JSON: {e}")))
    }
}

const UPCYCLE_PROMPT: &str = "Analyze this image to identify the garment type and material. Then, suggest 3 creative DIY upcycling or alteration projects for this specific item to give it a completely new life.
Examples: \"T-shirt to Crop Top\", \"Jeans to Tote Bag\".
Include a difficulty rating, estimated time, list of materials needed, and 3-4 simplified steps.";

fn outfit_prompt(description: &str) -> String {
    format!(
        "Generate 3 Pinterest-style outfit combinations for a {description}. Focus on creative re-wear and sustainability."
    )
}

fn repair_prompt(issue: &str, fabric: &str) -> String {
    format!(
        "Provide a quick 3-step repair guide for a {issue} on a {fabric} garment. Also provide a specific search query for a YouTube tutorial that would help with this exact repair."
    )
}

fn verify_prompt(action: ActionCategory) -> &'static str {
    match action {
        ActionCategory::Creator => {
            "Analyze this image. Does it look like a piece of clothing that is being repaired, upcycled, or a sewing project? Return JSON with boolean 'valid' and a short 'reason'."
        }
        ActionCategory::Merchant => {
            "Analyze this image. Does it look like a piece of clothing laid out nicely for sale or a screenshot of a marketplace listing? Return JSON with boolean 'valid' and a short 'reason'."
        }
        ActionCategory::Recycler => {
            "Analyze this image. Does it look like a donation receipt, a textile recycling bin, or a bag of clothes ready for donation? Return JSON with boolean 'valid' and a short 'reason'."
        }
    }
}

/// Search text for the shop finder.
fn shop_query(search: &ShopSearch) -> String {
    let postal = search
        .postal_code
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    match (postal, search.latitude, search.longitude) {
        (Some(postal), _, _) => format!("{SHOP_QUERY_BASE} in or near postal code {postal}"),
        (None, Some(_), Some(_)) => format!("{SHOP_QUERY_BASE} near my current location"),
        _ => format!("{SHOP_QUERY_BASE} nearby"),
    }
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn outfit_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "items": string_array(),
            },
            "required": ["title", "description", "items"],
        },
    })
}

fn repair_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "guideTitle": { "type": "STRING" },
            "steps": string_array(),
            "proTip": { "type": "STRING" },
            "youtubeSearchQuery": { "type": "STRING" },
        },
        "required": ["guideTitle", "steps", "proTip", "youtubeSearchQuery"],
    })
}

fn upcycle_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "projectTitle": { "type": "STRING" },
                "difficulty": { "type": "STRING" },
                "time": { "type": "STRING" },
                "description": { "type": "STRING" },
                "materials": string_array(),
                "steps": string_array(),
            },
            "required": ["projectTitle", "difficulty", "time", "description", "materials", "steps"],
        },
    })
}

fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "valid": { "type": "BOOLEAN" },
            "reason": { "type": "STRING" },
        },
        "required": ["valid", "reason"],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/jpeg;base64,aGVsbG8="), "aGVsbG8=");
        assert_eq!(strip_data_url("aGVsbG8="), "aGVsbG8=");
        assert_eq!(strip_data_url("data:image/jpeg;base64,"), "data:image/jpeg;base64,");
    }

    #[test]
    fn test_image_data_validates_base64() {
        let image = ImageData::from_upload("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(image.as_str(), "aGVsbG8=");
        assert!(ImageData::from_upload("").is_err());
        assert!(ImageData::from_upload("data:image/jpeg;base64,***").is_err());
    }

    #[test]
    fn test_shop_query_prefers_postal_code() {
        let search = ShopSearch {
            latitude: Some(49.28),
            longitude: Some(-123.12),
            postal_code: Some("V6B 1A1".to_string()),
        };
        assert!(shop_query(&search).ends_with("in or near postal code V6B 1A1"));
    }

    #[test]
    fn test_shop_query_location_and_fallback() {
        let located = ShopSearch {
            latitude: Some(49.28),
            longitude: Some(-123.12),
            postal_code: Some("  ".to_string()),
        };
        assert!(shop_query(&located).ends_with(" near my current location"));

        let half = ShopSearch {
            latitude: Some(49.28),
            ..Default::default()
        };
        assert!(shop_query(&half).ends_with(" nearby"));
        assert!(shop_query(&ShopSearch::default()).starts_with(SHOP_QUERY_BASE));
    }

    #[test]
    fn test_prompts_embed_input() {
        assert!(outfit_prompt("denim jacket").contains("for a denim jacket."));
        assert!(repair_prompt("torn seam", "cotton").contains("torn seam on a cotton garment"));
        assert!(verify_prompt(ActionCategory::Recycler).contains("donation receipt"));
    }

    #[test]
    fn test_schemas_match_answer_types() {
        let tip: Vec<StylingTip> = serde_json::from_value(json!([
            {"title": "Weekend", "description": "Easy", "items": ["jeans"]}
        ]))
        .unwrap();
        assert_eq!(tip.len(), 1);
        assert_eq!(repair_schema()["required"][3], "youtubeSearchQuery");
        assert_eq!(upcycle_schema()["items"]["required"].as_array().unwrap().len(), 6);
        assert_eq!(verdict_schema()["properties"]["valid"]["type"], "BOOLEAN");
    }
}
