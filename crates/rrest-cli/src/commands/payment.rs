//! `rrest payment`: look up and send payments through the gateway.

use clap::{Args, Subcommand};
use rrest_core::{PaymentResponse, RestAmount, RestPayment};
use serde_json::{json, Value};

use super::{read_reply, DEFAULT_ENDPOINT};

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Fetch a payment by transaction hash.
    Get(GetArgs),
    /// Sign and submit a payment.
    Send(SendArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Account the payment is viewed from.
    #[arg(short, long)]
    pub account: String,

    /// Transaction hash.
    #[arg(long)]
    pub hash: String,

    /// API endpoint of the gateway.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Sending account.
    #[arg(short, long)]
    pub account: String,

    /// Secret of the sending account.
    #[arg(short, long)]
    pub secret: String,

    /// Receiving account.
    #[arg(short, long)]
    pub destination: String,

    /// Amount to deliver, as value+currency+issuer (bare value for XRP).
    #[arg(long)]
    pub amount: String,

    /// Memo type text.
    #[arg(long)]
    pub memo_type: Option<String>,

    /// Memo data text.
    #[arg(long)]
    pub memo_data: Option<String>,

    /// Allow delivering less than the full amount.
    #[arg(long)]
    pub partial: bool,

    /// API endpoint of the gateway.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(cmd: &PaymentCommand) -> anyhow::Result<()> {
    match cmd {
        PaymentCommand::Get(args) => get(args).await,
        PaymentCommand::Send(args) => send(args).await,
    }
}

async fn get(args: &GetArgs) -> anyhow::Result<()> {
    let url = format!(
        "{}/v1/accounts/{}/payments/{}",
        args.endpoint, args.account, args.hash
    );
    let resp = reqwest::get(&url).await?;
    let reply: PaymentResponse = read_reply(resp).await?;
    for line in describe_payment(&reply.payment) {
        println!("{line}");
    }
    Ok(())
}

async fn send(args: &SendArgs) -> anyhow::Result<()> {
    let url = format!("{}/v1/accounts/{}/payments", args.endpoint, args.account);

    println!("Sending payment...");
    println!("  From:     {}", args.account);
    println!("  To:       {}", args.destination);
    println!("  Amount:   {}", args.amount);
    println!("  Via:      {}", args.endpoint);
    println!();

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&request_body(args)).send().await?;
    let reply: PaymentResponse = read_reply(resp).await?;

    println!("Payment submitted!");
    for line in describe_payment(&reply.payment) {
        println!("{line}");
    }
    Ok(())
}

/// The `{payment, secret}` body for a send.
fn request_body(args: &SendArgs) -> Value {
    let mut payment = json!({
        "source_account": args.account,
        "destination_account": args.destination,
        "destination_amount": args.amount,
        "partial_payment": args.partial,
    });
    if args.memo_type.is_some() || args.memo_data.is_some() {
        let mut memo = serde_json::Map::new();
        if let Some(memo_type) = &args.memo_type {
            memo.insert("MemoType".into(), json!(memo_type));
        }
        if let Some(memo_data) = &args.memo_data {
            memo.insert("MemoData".into(), json!(memo_data));
        }
        payment["memos"] = json!([memo]);
    }
    json!({"payment": payment, "secret": args.secret})
}

fn format_amount(amount: &RestAmount) -> String {
    if amount.issuer.is_empty() {
        format!("{} {}", amount.value, amount.currency)
    } else {
        format!("{} {} ({})", amount.value, amount.currency, amount.issuer)
    }
}

fn describe_payment(payment: &RestPayment) -> Vec<String> {
    let mut lines = vec![
        format!("  Hash:      {}", payment.hash),
        format!("  From:      {}", payment.source_account),
        format!("  To:        {}", payment.destination_account),
        format!("  Delivered: {}", format_amount(&payment.destination_amount)),
        format!("  State:     {} ({})", payment.state, payment.result),
    ];
    if !payment.direction.is_empty() {
        lines.push(format!("  Direction: {}", payment.direction));
    }
    if !payment.ledger.is_empty() {
        lines.push(format!("  Ledger:    {}", payment.ledger));
    }
    if !payment.timestamp.is_empty() {
        lines.push(format!("  Time:      {}", payment.timestamp));
    }
    lines.push(format!("  Fee:       {} XRP", payment.fee));
    for memo in payment.memos.iter().flatten() {
        lines.push(format!(
            "  Memo:      {} {}",
            memo.memo_type.as_deref().unwrap_or("-"),
            memo.memo_data.as_deref().unwrap_or("-")
        ));
    }
    lines
}
