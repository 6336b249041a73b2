fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use systray_protocol::{Action, Event, ItemId, decode_event, encode_action};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
        parsed
    }

    /// Encodes an action as a wire line and checks it is a single line
    /// equal to the fixture.
    fn assert_line_matches(action: &Action, name: &str) {
        let line = encode_action(action).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1, "{name} spans several lines");
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value, load_fixture(name));
    }

    // --- Outbound ---

    #[test]
    fn fixture_update_item() {
        let action: Action = roundtrip_test("update_item.json");
        let Action::UpdateItem { item, seq_id } = &action else {
            panic!("wrong variant: {action:?}");
        };
        assert_eq!(item.id, Some(ItemId(1)));
        assert_eq!(*seq_id, Some(5));
        assert_line_matches(&action, "update_item.json");
    }

    #[test]
    fn fixture_update_menu() {
        let action: Action = roundtrip_test("update_menu.json");
        let Action::UpdateMenu { menu } = &action else {
            panic!("wrong variant: {action:?}");
        };
        assert!(menu.items[1].is_separator());
        assert!(!menu.items[2].enabled);
        assert!(menu.items[2].items[0].hidden);
        assert_eq!(menu.items[2].items[0].id, Some(ItemId(4)));
        assert_line_matches(&action, "update_menu.json");
    }

    #[test]
    fn fixture_update_menu_and_item() {
        let action: Action = roundtrip_test("update_menu_and_item.json");
        assert_eq!(action.kind(), "update-menu-and-item");
        assert_line_matches(&action, "update_menu_and_item.json");
    }

    #[test]
    fn fixture_exit() {
        let action: Action = roundtrip_test("exit.json");
        assert_eq!(action, Action::Exit);
        assert_line_matches(&action, "exit.json");
    }

    // --- Inbound ---

    #[test]
    fn fixture_ready() {
        let event: Event = roundtrip_test("ready.json");
        assert_eq!(event, Event::Ready);
    }

    #[test]
    fn fixture_clicked() {
        let event: Event = roundtrip_test("clicked.json");
        let Event::Clicked { item, seq_id, id } = event else {
            panic!("wrong variant");
        };
        assert_eq!(id, ItemId(1));
        assert_eq!(seq_id, 0);
        assert_eq!(item.title.as_deref(), Some("Item A"));
        assert_eq!(item.checked, Some(true));
        assert_eq!(item.icon.as_deref(), Some(""));
    }

    #[test]
    fn inbound_lines_decode() {
        let ready = fs::read_to_string(fixtures_dir().join("ready.json")).unwrap();
        assert_eq!(decode_event(&ready).unwrap(), Event::Ready);

        let clicked = load_fixture("clicked.json").to_string();
        assert!(matches!(
            decode_event(&clicked).unwrap(),
            Event::Clicked { id: ItemId(1), .. }
        ));
    }
}
