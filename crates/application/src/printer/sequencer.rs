use domain::{
    Alignment, DomainError, FontScale, Language, PrinterError, PrinterService, ReceiptItem,
    ReceiptLayout, ReceiptRequest,
};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Render an amount as `€<amount>` with exactly two decimals
pub fn format_euro(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("€{:.2}", rounded)
}

/// Emits the fixed command sequence for one receipt.
///
/// Assumes the printer is ready. Amounts are computed before the first
/// command, so an out-of-range order never reaches the device. Each command
/// is a separate remote call and the first failure aborts the rest; nothing
/// already issued is undone.
#[derive(Debug, Clone, Default)]
pub struct ReceiptSequencer {
    layout: ReceiptLayout,
}

impl ReceiptSequencer {
    pub fn new(layout: ReceiptLayout) -> Self {
        Self { layout }
    }

    pub async fn print(
        &self,
        printer: &dyn PrinterService,
        request: &ReceiptRequest,
    ) -> Result<(), DomainError> {
        let line_totals = request.line_totals()?;
        debug!(
            order_number = %request.order_number,
            items = request.items.len(),
            total = %request.total,
            "Sequencing receipt"
        );

        self.header(printer).await?;
        self.order_number(printer, request).await?;
        self.items(printer, &request.items, &line_totals).await?;
        self.total(printer, request.total).await?;
        self.footer(printer, request.language).await?;

        printer.feed_lines(self.layout.feed_lines).await?;
        printer.cut_paper().await?;
        Ok(())
    }

    async fn header(&self, printer: &dyn PrinterService) -> Result<(), PrinterError> {
        printer.set_alignment(Alignment::Center).await?;
        printer.set_font_scale(FontScale::Large).await?;
        self.line(printer, &format!("{}\n", self.layout.store_name)).await?;
        self.line(printer, &format!("{}\n", self.layout.separator)).await?;

        printer.set_font_scale(FontScale::Normal).await?;
        printer.set_alignment(Alignment::Left).await
    }

    async fn order_number(
        &self,
        printer: &dyn PrinterService,
        request: &ReceiptRequest,
    ) -> Result<(), PrinterError> {
        // Label stays buffered so it lands on the same line as the number
        printer
            .print(request.language.order_label(), &self.layout.encoding, false)
            .await?;
        printer.set_bold(true).await?;
        self.line(printer, &format!("{}\n\n", request.order_number)).await?;
        printer.set_bold(false).await
    }

    async fn items(
        &self,
        printer: &dyn PrinterService,
        items: &[ReceiptItem],
        line_totals: &[Decimal],
    ) -> Result<(), PrinterError> {
        for (item, line_total) in items.iter().zip(line_totals) {
            self.line(printer, &format!("{}x {}\n", item.quantity, item.name)).await?;
            self.line(printer, &format!("  {}\n", format_euro(*line_total))).await?;
        }
        Ok(())
    }

    async fn total(&self, printer: &dyn PrinterService, total: Decimal) -> Result<(), PrinterError> {
        self.line(printer, &format!("\n{}\n", self.layout.separator)).await?;
        printer.set_font_scale(FontScale::Large).await?;
        printer.set_bold(true).await?;
        self.line(printer, &format!("TOTAL: {}\n", format_euro(total))).await?;
        printer.set_bold(false).await?;
        printer.set_font_scale(FontScale::Normal).await
    }

    async fn footer(
        &self,
        printer: &dyn PrinterService,
        language: Language,
    ) -> Result<(), PrinterError> {
        self.line(printer, "\n").await?;
        printer.set_alignment(Alignment::Center).await?;
        self.line(printer, &format!("{}\n", language.thank_you())).await?;
        printer.set_alignment(Alignment::Left).await
    }

    async fn line(&self, printer: &dyn PrinterService, text: &str) -> Result<(), PrinterError> {
        printer.print(text, &self.layout.encoding, true).await
    }
}
