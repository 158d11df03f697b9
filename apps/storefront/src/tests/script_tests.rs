use super::parse_action;

use shared::{domain::ProductId, protocol::StoreAction};

#[test]
fn parses_actions_with_ids() {
    assert_eq!(
        parse_action("add:3"),
        Ok(StoreAction::AddToCart { id: ProductId(3) })
    );
    assert_eq!(
        parse_action("DEC: 12"),
        Ok(StoreAction::Decrement { id: ProductId(12) })
    );
    assert_eq!(
        parse_action("modal:1"),
        Ok(StoreAction::OpenModal { id: ProductId(1) })
    );
}

#[test]
fn parses_bare_actions() {
    assert_eq!(parse_action("clear"), Ok(StoreAction::ClearCart));
    assert_eq!(parse_action("close-modal"), Ok(StoreAction::CloseModal));
}

#[test]
fn rejects_missing_or_bad_ids() {
    let err = parse_action("inc").expect_err("missing id");
    assert!(err.contains("needs a product id"));

    let err = parse_action("remove:abc").expect_err("bad id");
    assert!(err.contains("'abc' is not a product id"));
}

#[test]
fn rejects_unknown_verbs() {
    let err = parse_action("checkout").expect_err("unknown");
    assert!(err.starts_with("unknown action 'checkout'"));
}
