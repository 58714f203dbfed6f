//! # Chat Messages
//!
//! Message bodies sent through the chat service and the deep link that
//! carries them.
//!
//! ## Where Messages Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout ──► render_order_request() ──► business phone                 │
//! │                                                                         │
//! │  confirm_payment ──► render_invoice(Confirmed) ──► customer phone       │
//! │  resend_invoice  ──► render_invoice(Issued)    ──► customer phone       │
//! │                                                                         │
//! │  chat_link(base, phone, body) = <base>?phone=<phone>&text=<encoded>     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is pure text. Opening the link is a fire-and-forget side
//! effect owned by the caller, and only happens after persistence.

use chrono::{DateTime, TimeZone};
use std::fmt::{self, Write};
use url::Url;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::order::OrderDraft;
use crate::types::{CustomerProfile, OrderType, Sale, TaxRate};

/// Builds `<base>?phone=<phone>&text=<url-encoded body>`.
///
/// ```rust
/// use tcb_core::messaging::chat_link;
///
/// let link = chat_link("https://api.whatsapp.com/send", "573202466440", "Hola!").unwrap();
/// assert_eq!(link, "https://api.whatsapp.com/send?phone=573202466440&text=Hola%21");
/// ```
pub fn chat_link(base: &str, phone: &str, body: &str) -> CoreResult<String> {
    let url = Url::parse_with_params(base, &[("phone", phone.trim()), ("text", body)])
        .map_err(|e| CoreError::ChatLink(format!("{}: {}", base, e)))?;
    Ok(url.into())
}

/// Which customer-facing invoice to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceNotice {
    /// Plain copy of the invoice (admin "resend").
    Issued,
    /// Sent when the admin confirms payment; announces preparation.
    Confirmed,
}

/// Business-facing order summary opened at checkout.
///
/// `payment_accounts` are the account lines the restaurant publishes
/// (e.g. `Nequi: 320-246-6440`).
pub fn render_order_request(
    store_name: &str,
    draft: &OrderDraft,
    payment_accounts: &[String],
) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_order_request(&mut out, store_name, draft, payment_accounts);
    out
}

fn write_order_request(
    out: &mut String,
    store_name: &str,
    draft: &OrderDraft,
    payment_accounts: &[String],
) -> fmt::Result {
    writeln!(out, "🛒 *NUEVA ORDEN - CONFIRMACIÓN DE PAGO*")?;
    writeln!(out, "*{}*", store_name)?;
    writeln!(out)?;
    write_customer(out, &draft.customer)?;
    writeln!(out)?;
    writeln!(out, "🛍️ *Tipo de pedido:* {}", draft.order_type().display_name())?;
    writeln!(out)?;
    write_items(out, &draft.lines)?;
    writeln!(out)?;
    writeln!(out, "💰 *TOTAL A PAGAR:* {}", draft.totals.total)?;
    writeln!(out)?;

    if !payment_accounts.is_empty() {
        writeln!(out, "💳 *INFORMACIÓN DE PAGO:*")?;
        for account in payment_accounts {
            writeln!(out, "🏦 {}", account)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "⚠️ *IMPORTANTE:*")?;
    writeln!(
        out,
        "1️⃣ Realiza tu pago con el método seleccionado: *{}*",
        draft.payment_method.display_name()
    )?;
    writeln!(out, "2️⃣ *ENVÍA EL COMPROBANTE DE PAGO* por este mismo chat")?;
    writeln!(out, "3️⃣ Una vez confirmemos tu pago, recibirás tu *NÚMERO DE PEDIDO*")?;
    writeln!(out, "4️⃣ Podrás consultar el estado en nuestra página web")?;

    if let Some(notes) = non_blank(&draft.customer.notes) {
        writeln!(out)?;
        writeln!(out, "📝 *Notas:* {}", notes)?;
    }

    writeln!(out)?;
    write!(out, "*¡Esperamos tu comprobante para confirmar tu pedido!* ✅")
}

/// Customer-facing invoice for a stored sale.
///
/// The date is rendered in `tz` (the restaurant's local time).
pub fn render_invoice<Tz>(store_name: &str, sale: &Sale, notice: InvoiceNotice, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let _ = write_invoice(&mut out, store_name, sale, notice, &sale.date.with_timezone(tz));
    out
}

fn write_invoice<Tz>(
    out: &mut String,
    store_name: &str,
    sale: &Sale,
    notice: InvoiceNotice,
    date: &DateTime<Tz>,
) -> fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match notice {
        InvoiceNotice::Issued => writeln!(out, "🧾 *FACTURA ELECTRÓNICA*")?,
        InvoiceNotice::Confirmed => writeln!(out, "🧾 *FACTURA ELECTRÓNICA CONFIRMADA*")?,
    }
    writeln!(out, "*{}*", store_name)?;
    writeln!(out)?;
    if notice == InvoiceNotice::Confirmed {
        writeln!(out, "✅ *¡PAGO CONFIRMADO!*")?;
        writeln!(out)?;
    }

    writeln!(out, "📋 *Factura:* {}", sale.invoice_number)?;
    writeln!(out, "📅 *Fecha:* {}", date.format("%d/%m/%Y, %H:%M:%S"))?;
    writeln!(out)?;
    write_customer(out, &sale.customer)?;
    writeln!(out)?;
    writeln!(out, "🛍️ *Tipo de pedido:* {}", sale.order_type.display_name())?;
    writeln!(out)?;
    write_items(out, &sale.items)?;
    writeln!(out)?;

    writeln!(out, "💰 *RESUMEN:*")?;
    writeln!(out, "Subtotal: {}", sale.subtotal)?;
    writeln!(out, "IVA ({}%): {}", TaxRate::iva().percentage(), sale.tax)?;
    if sale.delivery_fee.is_positive() {
        writeln!(out, "Domicilio: {}", sale.delivery_fee)?;
    }
    match notice {
        InvoiceNotice::Issued => writeln!(out, "*TOTAL: {}*", sale.total)?,
        InvoiceNotice::Confirmed => writeln!(out, "*TOTAL PAGADO: {}*", sale.total)?,
    }
    writeln!(out)?;
    writeln!(out, "💳 *Método de pago:* {}", sale.payment_method.display_name())?;
    writeln!(out)?;

    match notice {
        InvoiceNotice::Issued => write!(out, "¡Gracias por tu compra! 🍔"),
        InvoiceNotice::Confirmed => {
            writeln!(out, "🍔 *Tu pedido está ahora en preparación*")?;
            write!(out, "¡Gracias por tu compra!")
        }
    }
}

fn write_customer(out: &mut String, customer: &CustomerProfile) -> fmt::Result {
    writeln!(out, "👤 *Cliente:* {}", customer.customer_name.trim())?;
    writeln!(out, "📱 *Teléfono:* {}", customer.customer_phone.trim())?;
    if customer.order_type == OrderType::Delivery {
        if let Some(address) = non_blank(&customer.address) {
            writeln!(out, "📍 *Dirección:* {}", address)?;
        }
        if let Some(details) = non_blank(&customer.address_details) {
            writeln!(out, "🏠 *Detalles:* {}", details)?;
        }
    }
    if customer.order_type == OrderType::DineIn {
        if let Some(table) = non_blank(&customer.table_number) {
            writeln!(out, "🪑 *Mesa:* {}", table)?;
        }
    }
    Ok(())
}

fn write_items(out: &mut String, lines: &[CartLine]) -> fmt::Result {
    writeln!(out, "📦 *PRODUCTOS:*")?;
    for line in lines {
        writeln!(out, "• {} x{} - {}", line.name, line.quantity, line.line_total())?;
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::OrderAction;
    use crate::money::Money;
    use crate::order::OrderIdentity;
    use crate::types::{PaymentMethod, Product, ProductCategory};
    use chrono::{FixedOffset, Utc};

    fn delivery_draft() -> OrderDraft {
        let burger = Product {
            id: 1,
            name: "Burger".to_string(),
            price: Money::from_pesos(15_000),
            category: ProductCategory::Food,
            subcategory: None,
            image: String::new(),
            description: String::new(),
            specifications: String::new(),
        };
        let customer = CustomerProfile {
            order_type: OrderType::Delivery,
            customer_name: "Ana".to_string(),
            customer_phone: "3001234567".to_string(),
            address: Some("Calle 10 # 5-20".to_string()),
            address_details: None,
            table_number: None,
            notes: Some("Sin cebolla".to_string()),
        };
        OrderDraft::prepare(&[CartLine::from_product(&burger, 2)], &customer, PaymentMethod::Cash)
            .unwrap()
    }

    #[test]
    fn test_chat_link_encodes_body() {
        let link = chat_link(
            "https://api.whatsapp.com/send",
            "573202466440",
            "*TOTAL:* $ 38.700\n¡Gracias!",
        )
        .unwrap();

        let parsed = Url::parse(&link).unwrap();
        assert_eq!(parsed.path(), "/send");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("phone".to_string(), "573202466440".to_string()));
        assert_eq!(pairs[1].1, "*TOTAL:* $ 38.700\n¡Gracias!");
        assert!(!link.contains('\n'));
    }

    #[test]
    fn test_chat_link_rejects_bad_base() {
        assert!(matches!(
            chat_link("not a url", "1", "x"),
            Err(CoreError::ChatLink(_))
        ));
    }

    #[test]
    fn test_order_request_mentions_total_and_method() {
        let body = render_order_request(
            "The Container BURGER",
            &delivery_draft(),
            &["*Nequi:* 320-246-6440".to_string()],
        );

        assert!(body.contains("*The Container BURGER*"));
        assert!(body.contains("• Burger x2 - $ 30.000"));
        assert!(body.contains("*TOTAL A PAGAR:* $ 38.700"));
        assert!(body.contains("*Efectivo*"));
        assert!(body.contains("📍 *Dirección:* Calle 10 # 5-20"));
        assert!(body.contains("📝 *Notas:* Sin cebolla"));
    }

    #[test]
    fn test_confirmed_invoice() {
        let now = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut sale = delivery_draft()
            .place(OrderIdentity::from_clock("TCB", now), now)
            .sale;
        sale.advance(OrderAction::ConfirmPayment).unwrap();

        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        let body = render_invoice("The Container BURGER", &sale, InvoiceNotice::Confirmed, &bogota);

        assert!(body.contains("¡PAGO CONFIRMADO!"));
        assert!(body.contains("📋 *Factura:* TCB-1700000000000"));
        assert!(body.contains("📅 *Fecha:* 14/11/2023, 17:13:20"));
        assert!(body.contains("IVA (19%): $ 5.700"));
        assert!(body.contains("Domicilio: $ 3.000"));
        assert!(body.contains("*TOTAL PAGADO: $ 38.700*"));
        assert!(body.contains("en preparación"));

        let issued = render_invoice("The Container BURGER", &sale, InvoiceNotice::Issued, &bogota);
        assert!(issued.contains("*TOTAL: $ 38.700*"));
        assert!(!issued.contains("CONFIRMADO"));
    }
}
