use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码
///
/// 前两位与 HTTP 状态码对应，后三位为细分编号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 400xx - 请求错误
    BadRequest = 40000,
    Validation = 40001,
    RubricWeightInvalid = 40002,
    TextTooShort = 40003,

    // 401xx - 未认证
    Unauthorized = 40100,

    // 403xx - 无权限
    Forbidden = 40300,
    PermissionDenied = 40301,

    // 404xx - 未找到
    NotFound = 40400,
    SubmissionNotFound = 40401,
    RubricNotFound = 40402,
    EvaluationNotFound = 40403,
    UserNotFound = 40404,

    // 409xx - 冲突 / 非法状态迁移
    Conflict = 40900,
    InvalidStateTransition = 40901,
    EvaluationInFlight = 40902,
    RubricInUse = 40903,

    // 429xx - 限流
    RateLimitExceeded = 42900,

    // 5xxxx - 服务端错误
    InternalServerError = 50000,
    EngineFailure = 50200,
}
