use domain::{Alignment, BusType, FontScale, PrinterError, PrinterService};
use infrastructure::printer::{EscPosPrinterService, MemoryConnection};

fn service() -> (EscPosPrinterService, MemoryConnection) {
    let connection = MemoryConnection::new();
    let service = EscPosPrinterService::new(Box::new(connection.clone()));
    (service, connection)
}

#[tokio::test]
async fn test_open_and_init_send_reset() {
    let (service, connection) = service();

    assert!(service.open(BusType::Usb, 0).await.unwrap());
    service.init().await.unwrap();

    assert_eq!(*connection.sent_data.lock().await, vec![0x1B, b'@']);
}

#[tokio::test]
async fn test_open_reports_false_when_unreachable() {
    let service = EscPosPrinterService::new(Box::new(MemoryConnection::unreachable()));
    assert!(!service.open(BusType::Usb, 0).await.unwrap());
}

#[tokio::test]
async fn test_commands_before_open_fail_as_remote_errors() {
    let (service, _connection) = service();
    let result = service.init().await;
    assert_eq!(result, Err(PrinterError::NotConnected));
}

#[tokio::test]
async fn test_style_commands_wait_for_a_flush() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.set_alignment(Alignment::Center).await.unwrap();
    service.set_font_scale(FontScale::Large).await.unwrap();
    service.set_bold(true).await.unwrap();
    assert!(connection.sent_data.lock().await.is_empty());

    service.print("YELOEAT\n", "UTF-8", true).await.unwrap();

    let mut expected = vec![0x1B, b'a', 0x01, 0x1D, b'!', 0x11, 0x1B, b'E', 0x01];
    expected.extend_from_slice(b"YELOEAT\n");
    assert_eq!(*connection.sent_data.lock().await, expected);
}

#[tokio::test]
async fn test_unflushed_label_joins_next_line() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.print("Order #: ", "UTF-8", false).await.unwrap();
    assert!(connection.sent_data.lock().await.is_empty());

    service.print("A100\n", "UTF-8", true).await.unwrap();
    assert_eq!(*connection.sent_data.lock().await, b"Order #: A100\n".to_vec());
}

#[tokio::test]
async fn test_euro_sign_is_sent_as_utf8() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.print("€10.00", "UTF-8", true).await.unwrap();
    assert_eq!(
        *connection.sent_data.lock().await,
        vec![0xE2, 0x82, 0xAC, b'1', b'0', b'.', b'0', b'0']
    );
}

#[tokio::test]
async fn test_other_charsets_are_encoded() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.print("Grüße", "windows-1252", true).await.unwrap();
    assert_eq!(
        *connection.sent_data.lock().await,
        vec![b'G', b'r', 0xFC, 0xDF, b'e']
    );
}

#[tokio::test]
async fn test_unknown_charset_is_rejected() {
    let (service, _connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    let result = service.print("x", "klingon", true).await;
    assert_eq!(
        result,
        Err(PrinterError::UnsupportedEncoding("klingon".to_string()))
    );
}

#[tokio::test]
async fn test_feed_and_cut() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.feed_lines(3).await.unwrap();
    service.cut_paper().await.unwrap();

    assert_eq!(
        *connection.sent_data.lock().await,
        vec![0x1B, b'd', 3, 0x1D, b'V', 0x00]
    );
}

#[tokio::test]
async fn test_status_queries_use_realtime_requests() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();
    *connection.status_byte.lock().await = Some(0x12);

    assert_eq!(service.get_status(1).await.unwrap(), 0x12);
    assert!(service.get_paper_status().await.unwrap());

    assert_eq!(
        *connection.queries.lock().await,
        vec![vec![0x10, 0x04, 1], vec![0x10, 0x04, 4]]
    );
}

#[tokio::test]
async fn test_paper_end_bits_report_paper_issue() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();
    *connection.status_byte.lock().await = Some(0x72);

    assert!(!service.get_paper_status().await.unwrap());
}

#[tokio::test]
async fn test_write_only_link_reports_ok_status() {
    let (service, _connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    assert_eq!(service.get_status(1).await.unwrap(), 0);
    assert!(service.get_paper_status().await.unwrap());
}

#[tokio::test]
async fn test_invalid_status_mode() {
    let (service, _connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    assert!(matches!(
        service.get_status(9).await,
        Err(PrinterError::Remote(_))
    ));
}

#[tokio::test]
async fn test_close_flushes_pending_and_disconnects() {
    let (service, connection) = service();
    service.open(BusType::Usb, 0).await.unwrap();

    service.print("tail", "UTF-8", false).await.unwrap();
    service.close().await.unwrap();

    assert_eq!(*connection.sent_data.lock().await, b"tail".to_vec());
    assert_eq!(service.init().await, Err(PrinterError::NotConnected));
}
