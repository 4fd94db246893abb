//! Dialogue orchestrator: turns exchange tickets into oracle calls.

use std::sync::Arc;

use heartquest_domain::{ExchangeContext, MissionAnalysis, NpcReaction, PlayerAction};
use tracing::{debug, warn};

use super::prompt::{self, ANALYSIS_SYSTEM_PROMPT, MAX_TOKENS};
use super::response_parser::{parse_analysis, parse_reaction};
use crate::infrastructure::ports::{ApiKey, ChatMessage, LlmError, LlmPort, LlmRequest};

/// Builds prompts, calls the oracle and parses its replies.
///
/// Stateless apart from the port; everything it needs arrives in the
/// [`ExchangeContext`] captured when the exchange was admitted.
pub struct DialogueOrchestrator {
    llm: Arc<dyn LlmPort>,
}

impl DialogueOrchestrator {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    /// Ask the NPC to react to one player action.
    ///
    /// Only transport failures surface as errors; a malformed reply still
    /// yields a reaction.
    pub async fn submit_action(
        &self,
        ctx: &ExchangeContext,
        action: &PlayerAction,
        api_key: Option<ApiKey>,
    ) -> Result<NpcReaction, LlmError> {
        let api_key = api_key.ok_or(LlmError::MissingCredential)?;

        let request = LlmRequest::new(vec![ChatMessage::user(prompt::action_user_message(action))])
            .with_system_prompt(prompt::action_system_prompt(ctx, action))
            .with_max_tokens(Some(MAX_TOKENS))
            .with_api_key(Some(api_key));

        let response = self.llm.generate(request).await.map_err(|e| {
            warn!(action_id = %action.id, error = %e, "NPC exchange failed");
            e
        })?;

        let reaction = parse_reaction(&response.content);
        debug!(
            action_id = %action.id,
            mood = %reaction.mood,
            affection_delta = reaction.affection_delta,
            directive = %reaction.directive,
            "NPC reacted"
        );
        Ok(reaction)
    }

    /// Ask the narrator to review the finished mission.
    pub async fn analyze_mission(
        &self,
        ctx: &ExchangeContext,
        api_key: Option<ApiKey>,
    ) -> Result<MissionAnalysis, LlmError> {
        let api_key = api_key.ok_or(LlmError::MissingCredential)?;

        let request = LlmRequest::new(vec![ChatMessage::user(prompt::analysis_prompt(ctx))])
            .with_system_prompt(ANALYSIS_SYSTEM_PROMPT)
            .with_max_tokens(Some(MAX_TOKENS))
            .with_api_key(Some(api_key));

        let response = self.llm.generate(request).await.map_err(|e| {
            warn!(mission = %ctx.mission.title, error = %e, "Mission analysis failed");
            e
        })?;

        let analysis = parse_analysis(&response.content);
        debug!(
            mission = %ctx.mission.title,
            affection_change = analysis.affection_change,
            "Mission analyzed"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmResponse, MessageRole, MockLlmPort};
    use heartquest_domain::{Affection, BehaviorDirective, Catalog, NpcMood};

    fn context() -> ExchangeContext {
        ExchangeContext {
            mission: Catalog::standard().mission(0).clone(),
            affection: Affection::new(10),
            mood: NpcMood::Neutral,
            history: Vec::new(),
            player_name: None,
        }
    }

    fn key() -> Option<ApiKey> {
        ApiKey::new("sk-test")
    }

    #[tokio::test]
    async fn action_request_shape_and_parsed_reaction() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|req| {
                req.max_tokens == Some(512)
                    && req.messages.len() == 1
                    && req.messages[0].role == MessageRole::User
                    && req.messages[0].content == "*Smile*"
                    && req
                        .system_prompt
                        .as_deref()
                        .is_some_and(|p| p.starts_with("You are Adrian"))
                    && req.api_key.as_ref().map(ApiKey::expose) == Some("sk-test")
            })
            .times(1)
            .returning(|_| {
                Ok(LlmResponse::text(
                    r#"{"dialogue":"Hey.","mood":"happy","affection_delta":4,"npc_action":"emote"}"#,
                ))
            });

        let orchestrator = DialogueOrchestrator::new(Arc::new(llm));
        let reaction = orchestrator
            .submit_action(&context(), &PlayerAction::new("smile", "Smile", "😊"), key())
            .await
            .unwrap();

        assert_eq!(reaction.dialogue, "Hey.");
        assert_eq!(reaction.mood, NpcMood::Happy);
        assert_eq!(reaction.affection_delta, 4);
        assert_eq!(reaction.directive, BehaviorDirective::Emote);
    }

    #[tokio::test]
    async fn missing_credential_never_reaches_the_port() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().never();

        let orchestrator = DialogueOrchestrator::new(Arc::new(llm));
        let err = orchestrator
            .submit_action(&context(), &PlayerAction::free_text("hi"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));

        let err = orchestrator.analyze_mission(&context(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::Timeout(90)));

        let orchestrator = DialogueOrchestrator::new(Arc::new(llm));
        let err = orchestrator
            .submit_action(&context(), &PlayerAction::free_text("hi"), key())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout(90)));
    }

    #[tokio::test]
    async fn analysis_uses_narrator_prompt() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|req| {
                req.system_prompt.as_deref() == Some("You are a game narrator and analyst.")
                    && req.messages[0].content.contains("MISSION: \"First Encounter\"")
            })
            .returning(|_| {
                Ok(LlmResponse::text(
                    r#"{"summary":"Lovely.","affection_change":9,"npc_mood":"flirty","advice":"Ask about his book."}"#,
                ))
            });

        let orchestrator = DialogueOrchestrator::new(Arc::new(llm));
        let analysis = orchestrator.analyze_mission(&context(), key()).await.unwrap();
        assert_eq!(analysis.summary, "Lovely.");
        assert_eq!(analysis.affection_change, 9);
        assert_eq!(analysis.npc_mood, NpcMood::Flirty);
    }
}
