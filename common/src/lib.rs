//! Patient Records Common Library
//!
//! CLIとWeb(WASM)で共有される型・ゲートウェイ抽象・画面コントローラ

pub mod api;
pub mod cache;
pub mod endpoint;
pub mod error;
pub mod feed;
pub mod lifecycle;
pub mod options;
pub mod pagination;
pub mod profile;
pub mod records;
pub mod search;
pub mod types;

#[cfg(test)]
mod fake;

pub use api::PatientApi;
pub use cache::{QueryCache, SEARCH_QUERY_KEY};
pub use endpoint::{Endpoint, Method, UPLOAD_FIELD};
pub use error::{Error, Result};
pub use feed::{load_page, FeedController, FeedRequest, SKELETON_COUNT};
pub use lifecycle::{FetchGate, FetchState, Ticket};
pub use pagination::Pagination;
pub use profile::{
    submit_profile, DiagnosisKey, FieldError, ProfileEditor, ProfileField, ProfileForm,
    ProfilePatch, SubmitJob, SubmitState, ValidationErrors,
};
pub use records::{RecordTab, RecordTickets, RecordViewer, TabView};
pub use search::{
    compact_rows, fetch_search, ClearOutcome, ResultRow, RouteQuery, SearchController,
    SearchRequest, SearchView, COMPACT_RESULT_LIMIT, NO_RESULTS_MESSAGE,
};
pub use types::*;
