use std::str::FromStr as _;

use serde::Deserialize;

/// A non-200 response from the API.
///
/// All failure statuses end up here; callers that need to tell a missing
/// record from a rejected payload should look at [`ApiError::status`] or the
/// best-effort [`ApiError::kind`].
#[derive(Debug, Clone)]
pub struct ApiError {
    status: http::StatusCode,
    body: String,
    request_body: Option<String>,
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        match self.raw() {
            Some(raw) => {
                write!(f, ": {}", raw.kind())?;
                if let Some(message) = raw.message() {
                    write!(f, ": {message}")?;
                }
            }
            None if !self.body.is_empty() => write!(f, ": {}", self.body)?,
            None => (),
        }

        Ok(())
    }
}

impl ApiError {
    pub(crate) fn new(status: http::StatusCode, body: &[u8]) -> Self {
        Self {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
            request_body: None,
        }
    }

    pub(crate) fn with_request_body(self, request_body: String) -> Self {
        Self {
            request_body: Some(request_body),
            ..self
        }
    }

    /// The HTTP status of the response.
    pub fn status(&self) -> http::StatusCode {
        self.status
    }

    /// The raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The JSON body that was sent, for create and update requests.
    pub fn request_body(&self) -> Option<&str> {
        self.request_body.as_deref()
    }

    /// The error code reported by the API, if the body contained one.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        self.raw().map(|raw| raw.kind())
    }

    /// The longer description reported by the API, if any.
    pub fn message(&self) -> Option<String> {
        self.raw()?.message().map(str::to_owned)
    }

    fn raw(&self) -> Option<RawApiError> {
        serde_json::from_str::<RawErrorBody>(&self.body)
            .ok()
            .map(|b| b.error)
    }
}

/// Indicates that the error code was unrecognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid error kind: {0}")]
pub struct InvalidErrorKind(String);

macro_rules! api_error_kinds {
    ($($code:literal => $variant:ident),* $(,)?) => {
        /// An error code from the API.
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum ApiErrorKind {
            $(
                #[doc = $code]
                $variant,
            )*
            /// An unknown error code.
            Unknown(String),
        }

        impl std::fmt::Display for ApiErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $(ApiErrorKind::$variant => $code,)*
                    ApiErrorKind::Unknown(kind) => kind,
                })
            }
        }

        impl std::str::FromStr for ApiErrorKind {
            type Err = InvalidErrorKind;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($code => ApiErrorKind::$variant,)*
                    _ => return Err(InvalidErrorKind(s.to_string())),
                })
            }
        }
    };
}

api_error_kinds! {
    "AUTHENTICATION_REQUIRED" => AuthenticationRequired,
    "CANNOT_UPDATE_COMPUTED_FIELD" => CannotUpdateComputedField,
    "INVALID_FILTER_BY_FORMULA" => InvalidFilterByFormula,
    "INVALID_MULTIPLE_CHOICE_OPTIONS" => InvalidMultipleChoiceOptions,
    "INVALID_OFFSET_VALUE" => InvalidOffsetValue,
    "INVALID_PERMISSIONS" => InvalidPermissions,
    "INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND" => InvalidPermissionsOrModelNotFound,
    "INVALID_RECORDS" => InvalidRecords,
    "INVALID_REQUEST_MISSING_FIELDS" => InvalidRequestMissingFields,
    "INVALID_REQUEST_UNKNOWN" => InvalidRequestUnknown,
    "INVALID_VALUE_FOR_COLUMN" => InvalidValueForColumn,
    "LIST_RECORDS_ITERATOR_NOT_AVAILABLE" => ListRecordsIteratorNotAvailable,
    "MODEL_ID_NOT_FOUND" => ModelIdNotFound,
    "NOT_FOUND" => NotFound,
    "PUBLIC_API_BILLING_LIMIT_EXCEEDED" => PublicApiBillingLimitExceeded,
    "RATE_LIMIT_REACHED" => RateLimitReached,
    "REQUEST_TOO_LARGE" => RequestTooLarge,
    "ROW_DOES_NOT_EXIST" => RowDoesNotExist,
    "SERVER_ERROR" => ServerError,
    "SERVICE_UNAVAILABLE" => ServiceUnavailable,
    "TABLE_NOT_FOUND" => TableNotFound,
    "UNKNOWN_FIELD_NAME" => UnknownFieldName,
}

#[derive(Debug, Deserialize)]
struct RawErrorBody {
    error: RawApiError,
}

// The API reports errors either as a bare code or as an object with a
// message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawApiError {
    Detailed {
        r#type: String,
        message: Option<String>,
    },
    Code(String),
}

impl RawApiError {
    fn kind(&self) -> ApiErrorKind {
        let code = match self {
            RawApiError::Detailed { r#type, .. } => r#type,
            RawApiError::Code(code) => code,
        };

        ApiErrorKind::from_str(code).unwrap_or_else(|_| ApiErrorKind::Unknown(code.clone()))
    }

    fn message(&self) -> Option<&str> {
        match self {
            RawApiError::Detailed { message, .. } => message.as_deref(),
            RawApiError::Code(_) => None,
        }
    }
}
