pub mod click_element;
pub mod complete;
pub mod input_text;
pub mod key_press;
pub mod navigation;
pub mod read_document;
pub mod scroll;
pub mod select_option;

pub use click_element::ClickElementAction;
pub use complete::{CompleteAction, StructuredCompleteAction};
pub use input_text::InputTextAction;
pub use key_press::KeyPressAction;
pub use navigation::{GoToUrlAction, PageBackAction, PageForwardAction, RefreshPageAction};
pub use read_document::ReadDocumentAction;
pub use scroll::ScrollAction;
pub use select_option::SelectOptionAction;

use crate::error::ActionError;

pub(crate) fn index_param(params: &serde_json::Value) -> Result<u32, ActionError> {
    params["index"]
        .as_u64()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| ActionError::ValidationError("Missing 'index' field".to_string()))
}

pub(crate) fn string_param<'a>(
    params: &'a serde_json::Value,
    field: &str,
) -> Result<&'a str, ActionError> {
    params[field]
        .as_str()
        .ok_or_else(|| ActionError::ValidationError(format!("Missing '{}' field", field)))
}
