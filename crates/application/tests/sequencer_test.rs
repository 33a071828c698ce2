use application::ReceiptSequencer;
use domain::{Alignment, DomainError, FontScale, Language, ReceiptItem, ReceiptRequest};
use infrastructure::printer::{DeviceCommand, MockPrinterService};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Print commands that do not depend on the number of items
const FIXED_PRINT_LINES: usize = 8;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn burger_order() -> ReceiptRequest {
    ReceiptRequest::new(
        "A100",
        vec![ReceiptItem::new("Burger", 2, dec("5.00"))],
        dec("10.00"),
    )
}

fn print(text: &str, flush: bool) -> DeviceCommand {
    DeviceCommand::Print {
        text: text.to_string(),
        encoding: "UTF-8".to_string(),
        flush,
    }
}

#[tokio::test]
async fn test_full_command_sequence() {
    let printer = MockPrinterService::new();
    ReceiptSequencer::default()
        .print(&printer, &burger_order())
        .await
        .unwrap();

    let expected = vec![
        DeviceCommand::SetAlignment(Alignment::Center),
        DeviceCommand::SetFontScale(FontScale::Large),
        print("YELOEAT\n", true),
        print("==================\n", true),
        DeviceCommand::SetFontScale(FontScale::Normal),
        DeviceCommand::SetAlignment(Alignment::Left),
        print("Bestellung #: ", false),
        DeviceCommand::SetBold(true),
        print("A100\n\n", true),
        DeviceCommand::SetBold(false),
        print("2x Burger\n", true),
        print("  €10.00\n", true),
        print("\n==================\n", true),
        DeviceCommand::SetFontScale(FontScale::Large),
        DeviceCommand::SetBold(true),
        print("TOTAL: €10.00\n", true),
        DeviceCommand::SetBold(false),
        DeviceCommand::SetFontScale(FontScale::Normal),
        print("\n", true),
        DeviceCommand::SetAlignment(Alignment::Center),
        print("Vielen Dank!\n", true),
        DeviceCommand::SetAlignment(Alignment::Left),
        DeviceCommand::FeedLines(3),
        DeviceCommand::CutPaper,
    ];

    assert_eq!(printer.commands().await, expected);
}

#[tokio::test]
async fn test_print_line_count_grows_by_two_per_item() {
    for n in [0usize, 1, 5] {
        let items = (0..n)
            .map(|i| ReceiptItem::new(format!("Item {}", i), 1, dec("1.00")))
            .collect();
        let request = ReceiptRequest::new("N1", items, Decimal::from(n as u32));

        let printer = MockPrinterService::new();
        ReceiptSequencer::default()
            .print(&printer, &request)
            .await
            .unwrap();

        assert_eq!(printer.printed_lines().await.len(), FIXED_PRINT_LINES + 2 * n);
    }
}

#[tokio::test]
async fn test_items_are_printed_in_input_order() {
    let cola = ReceiptItem::new("Cola", 2, dec("2.99"));
    let fries = ReceiptItem::new("Fries", 1, dec("3.50"));

    let forward = MockPrinterService::new();
    let request = ReceiptRequest::new("7", vec![cola.clone(), fries.clone()], dec("9.48"));
    ReceiptSequencer::default()
        .print(&forward, &request)
        .await
        .unwrap();

    let reversed = MockPrinterService::new();
    let request = ReceiptRequest::new("7", vec![fries, cola], dec("9.48"));
    ReceiptSequencer::default()
        .print(&reversed, &request)
        .await
        .unwrap();

    let forward_lines = forward.printed_lines().await;
    let reversed_lines = reversed.printed_lines().await;
    assert_eq!(
        &forward_lines[4..8],
        &["2x Cola\n", "  €5.98\n", "1x Fries\n", "  €3.50\n"]
    );
    assert_eq!(
        &reversed_lines[4..8],
        &["1x Fries\n", "  €3.50\n", "2x Cola\n", "  €5.98\n"]
    );
}

#[tokio::test]
async fn test_totals_always_have_two_decimals() {
    for (total, rendered) in [("12.5", "TOTAL: €12.50\n"), ("3", "TOTAL: €3.00\n")] {
        let printer = MockPrinterService::new();
        let request = ReceiptRequest::new("T", Vec::new(), dec(total));
        ReceiptSequencer::default()
            .print(&printer, &request)
            .await
            .unwrap();

        assert!(printer.printed_lines().await.contains(&rendered.to_string()));
    }
}

#[tokio::test]
async fn test_english_strings() {
    let printer = MockPrinterService::new();
    let request = burger_order().with_language(Language::En);
    ReceiptSequencer::default()
        .print(&printer, &request)
        .await
        .unwrap();

    let lines = printer.printed_lines().await;
    assert!(lines.contains(&"Order #: ".to_string()));
    assert!(lines.contains(&"Thank you!\n".to_string()));
}

#[tokio::test]
async fn test_german_is_default_and_fallback() {
    for language in [None, Some("de"), Some("fr")] {
        let mut payload = serde_json::json!({ "orderNumber": "A1", "total": 1 });
        if let Some(language) = language {
            payload["language"] = serde_json::json!(language);
        }
        let request: ReceiptRequest = serde_json::from_value(payload).unwrap();

        let printer = MockPrinterService::new();
        ReceiptSequencer::default()
            .print(&printer, &request)
            .await
            .unwrap();

        let lines = printer.printed_lines().await;
        assert!(lines.contains(&"Bestellung #: ".to_string()));
        assert!(lines.contains(&"Vielen Dank!\n".to_string()));
    }
}

#[tokio::test]
async fn test_failure_aborts_remaining_steps_without_rollback() {
    let full = MockPrinterService::new();
    ReceiptSequencer::default()
        .print(&full, &burger_order())
        .await
        .unwrap();
    let full_sequence = full.commands().await;

    for k in [1usize, 9, 12, full_sequence.len()] {
        let printer = MockPrinterService::new();
        printer.fail_after(k - 1).await;

        let result = ReceiptSequencer::default()
            .print(&printer, &burger_order())
            .await;

        assert!(result.is_err(), "step {} should fail", k);
        // Steps 1..k were issued exactly as in a full run, nothing after
        assert_eq!(printer.commands().await, full_sequence[..k].to_vec());
    }
}

#[tokio::test]
async fn test_out_of_range_line_total_prints_nothing() {
    let printer = MockPrinterService::new();
    let request = ReceiptRequest::new(
        "A100",
        vec![
            ReceiptItem::new("Burger", 2, dec("5.00")),
            ReceiptItem::new("Gold", 4_000_000_000, dec("100000000000000000000")),
        ],
        dec("10.00"),
    );

    let result = ReceiptSequencer::default().print(&printer, &request).await;

    assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    assert!(printer.commands().await.is_empty());
}

#[tokio::test]
async fn test_device_failure_is_a_remote_call_error() {
    let printer = MockPrinterService::new();
    printer.fail_after(0).await;

    let result = ReceiptSequencer::default()
        .print(&printer, &burger_order())
        .await;

    assert!(matches!(result, Err(DomainError::RemoteCall(ref detail)) if detail.contains("Simulated failure")));
}

#[tokio::test]
async fn test_custom_layout() {
    let layout = domain::ReceiptLayout {
        store_name: "CORNER CAFE".to_string(),
        separator: "----".to_string(),
        feed_lines: 5,
        encoding: "UTF-8".to_string(),
    };
    let printer = MockPrinterService::new();
    ReceiptSequencer::new(layout)
        .print(&printer, &burger_order())
        .await
        .unwrap();

    let commands = printer.commands().await;
    assert_eq!(commands[2], print("CORNER CAFE\n", true));
    assert_eq!(commands[3], print("----\n", true));
    assert!(commands.contains(&DeviceCommand::FeedLines(5)));
}
