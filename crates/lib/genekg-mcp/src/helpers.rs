use std::borrow::Cow;

use genekg_core::control::ControlError;
use genekg_core::store::StoreError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub(crate) fn map_err(err: ControlError) -> ErrorData {
    let code = match &err {
        ControlError::Parse(_) => ErrorCode::INVALID_PARAMS,
        ControlError::Store(StoreError::InvalidInput(_) | StoreError::MissingReference { .. }) => {
            ErrorCode::INVALID_PARAMS
        }
        ControlError::Io(_) | ControlError::Store(_) | ControlError::Task(_) => {
            ErrorCode::INTERNAL_ERROR
        }
    };
    mcp_err(code, err.to_string())
}
