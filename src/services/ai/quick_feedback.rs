use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AiService;
use crate::models::ai::requests::QuickFeedbackRequest;
use crate::models::ai::responses::QuickFeedbackResponse;
use crate::models::users::entities::ActorContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::engine::analyzer;
use crate::utils::validate::{QUICK_FEEDBACK_MAX_CHARS, validate_quick_feedback_text};

/// 对任意文本生成快速反馈，同步返回，不产生评估记录
/// POST /ai/quick-feedback
pub async fn quick_feedback(
    service: &AiService,
    request: &HttpRequest,
    _actor: ActorContext,
    req: QuickFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let engine = service.get_engine(request);

    if let Err(msg) = validate_quick_feedback_text(&req.text) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::TextTooShort, msg)));
    }

    // 超长文本截断后再送入引擎
    let text: String = req.text.chars().take(QUICK_FEEDBACK_MAX_CHARS).collect();

    match analyzer::analyze_quick(engine.as_ref(), &text).await {
        Ok(output) => Ok(HttpResponse::Ok().json(ApiResponse::success(QuickFeedbackResponse {
            grammar_feedback: output.grammar_feedback,
            clarity_feedback: output.clarity_feedback,
            suggestions: output.suggestions,
        }))),
        Err(e) => Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::EngineFailure,
            format!("反馈生成失败: {e}"),
        ))),
    }
}
