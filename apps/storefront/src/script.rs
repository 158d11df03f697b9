//! Command-line spelling of store actions (`add:3`, `dec:3`, `clear`, ...).

use shared::{domain::ProductId, protocol::StoreAction};

pub fn parse_action(raw: &str) -> Result<StoreAction, String> {
    let (verb, arg) = match raw.split_once(':') {
        Some((verb, arg)) => (verb.trim(), Some(arg.trim())),
        None => (raw.trim(), None),
    };

    let id = || -> Result<ProductId, String> {
        let arg = arg.ok_or_else(|| format!("action '{verb}' needs a product id, e.g. {verb}:1"))?;
        arg.parse::<i64>()
            .map(ProductId)
            .map_err(|_| format!("'{arg}' is not a product id"))
    };

    match verb.to_ascii_lowercase().as_str() {
        "detail" => Ok(StoreAction::SelectDetail { id: id()? }),
        "modal" => Ok(StoreAction::OpenModal { id: id()? }),
        "close-modal" => Ok(StoreAction::CloseModal),
        "add" => Ok(StoreAction::AddToCart { id: id()? }),
        "inc" => Ok(StoreAction::Increment { id: id()? }),
        "dec" => Ok(StoreAction::Decrement { id: id()? }),
        "remove" => Ok(StoreAction::RemoveItem { id: id()? }),
        "clear" => Ok(StoreAction::ClearCart),
        other => Err(format!(
            "unknown action '{other}' (expected detail, modal, close-modal, add, inc, dec, remove or clear)"
        )),
    }
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
