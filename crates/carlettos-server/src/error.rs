// Error handling for the API process
// Maps application errors carried in anyhow::Error onto HTTP responses

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;

pub use carlettos_common::error::{
    DATA_ACCESS_ERROR, PARAMETER_VALIDATE_ERROR, RESOURCE_CONFLICT, RESOURCE_NOT_FOUND,
    SERVER_ERROR,
};
pub use carlettos_common::{CarlettosError, ErrorCode};

use crate::model::response as common;

// Local wrapper so actix-web's ResponseError can be implemented
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<CarlettosError> for AppError {
    fn from(value: CarlettosError) -> Self {
        AppError {
            inner: anyhow::Error::new(value),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    fn status_and_code(&self) -> (u16, &'static ErrorCode<'static>) {
        match self.downcast_ref::<CarlettosError>() {
            Some(CarlettosError::IllegalArgument(_)) => (400, &PARAMETER_VALIDATE_ERROR),
            Some(CarlettosError::ConfigError(_)) => (400, &PARAMETER_VALIDATE_ERROR),
            Some(CarlettosError::NotFound(_)) => (404, &RESOURCE_NOT_FOUND),
            Some(CarlettosError::Conflict(_)) => (409, &RESOURCE_CONFLICT),
            Some(CarlettosError::DatabaseError(_)) => (500, &DATA_ACCESS_ERROR),
            Some(CarlettosError::InternalError(_)) | None => (500, &SERVER_ERROR),
        }
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        let (status, _) = self.status_and_code();
        actix_web::http::StatusCode::from_u16(status).unwrap_or_default()
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();
        common::Result::<String>::http_response(
            status,
            code.code,
            self.inner.to_string(),
            String::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(CarlettosError::not_found("task:1"));
        assert_eq!(err.status_code().as_u16(), 404);
        assert_eq!(err.to_string(), "'task:1' not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CarlettosError::IllegalArgument("bad".into()), 400),
            (CarlettosError::Conflict("dup".into()), 409),
            (CarlettosError::DatabaseError("down".into()), 500),
            (CarlettosError::InternalError("oops".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_unknown_error_is_server_error() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert!(err.downcast_ref::<CarlettosError>().is_none());
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[actix_web::test]
    async fn test_error_envelope() {
        let resp = AppError::from(CarlettosError::illegal_argument("bad board")).error_response();
        assert_eq!(resp.status().as_u16(), 400);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], PARAMETER_VALIDATE_ERROR.code);
        assert_eq!(json["message"], "caused: bad board");
        assert_eq!(json["data"], "");
    }
}
