//! Runs a full booking against Calendly: availability, intake fields, booking.
//!
//! Answers are read from a JSON file holding either an array of
//! `{name?, question?, answer_key?, value}` objects or an object mapping
//! answer keys (`a1`, `a2`, ...) to values.

use clap::Parser;
use connectify_calendly::logic::{self, ProgressSink};
use connectify_calendly::models::{
    AnswerEntry, BookingInformation, BookingOutcome, CreateBookingRequest, SchedulingParams,
};
use connectify_calendly::{CalendlyClient, CalendlyError};
use connectify_common::logging;
use connectify_config::load_config;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about = "Book a configured Calendly event from the command line")]
struct Args {
    /// Configured event name, e.g. "Test Event"
    #[arg(short, long)]
    event: String,

    /// Day of the meeting (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Start time in UTC (HH:MM)
    #[arg(short, long)]
    time: String,

    /// Invitee timezone (IANA name); defaults to calendly.default_timezone
    #[arg(long)]
    timezone: Option<String>,

    /// Invitee full name
    #[arg(long)]
    name: String,

    /// Invitee email
    #[arg(long)]
    email: String,

    /// JSON file with the answers to the custom questions
    #[arg(short, long)]
    answers: Option<PathBuf>,

    /// Book even when the requested time is not reported as available
    #[arg(long)]
    force: bool,
}

/// Prints progress lines the way an operator wants to read them.
struct Console;

impl ProgressSink for Console {
    fn progress(&self, message: &str) {
        println!("[STREAM] {}", message);
    }
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(e) = run().await {
        error!("calendly-book failed: {}", e);
        eprintln!("\nWorkflow failed: {}", e);
        process::exit(1);
    }
}

fn read_answers(path: &Path) -> Result<Vec<AnswerEntry>, Box<dyn std::error::Error>> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| AnswerEntry {
                answer_key: Some(key),
                value,
                ..Default::default()
            })
            .collect()),
        other => Ok(serde_json::from_value(other)?),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config()?;
    let calendly = config
        .calendly
        .ok_or_else(|| CalendlyError::ConfigError("calendly section missing".to_string()))?;
    let client = CalendlyClient::from_config(&calendly)?;
    let answers = match &args.answers {
        Some(path) => read_answers(path)?,
        None => Vec::new(),
    };

    println!("1. Checking availability...");
    let params = SchedulingParams {
        event_name: Some(args.event.clone()),
        timezone: args.timezone.clone(),
        target_date: Some(args.date.clone()),
        time: Some(args.time.clone()),
        check_with_range: None,
    };
    let availability = logic::check_availability(&client, &calendly, &params, &Console).await?;
    if !availability.is_specific_time_available {
        println!("{} {} is not available.", args.date, args.time);
        if !args.force {
            return Ok(());
        }
    }

    println!("\n2. Loading booking fields...");
    let fields = logic::get_booking_fields(&client, &calendly, &params, &Console).await?;
    for field in &fields.fields {
        println!(
            "   {} {}{}",
            field.answer_key,
            field.label,
            if field.required { " (required)" } else { "" }
        );
    }

    println!("\n3. Booking...");
    let request = CreateBookingRequest {
        event_name: Some(args.event),
        timezone: args.timezone,
        target_date: Some(args.date),
        time: Some(args.time),
        booking_information: Some(BookingInformation {
            full_name: Some(args.name),
            email: Some(args.email),
            answers: Some(answers),
            ..Default::default()
        }),
    };
    match logic::create_booking(&client, &calendly, &request, &Console).await? {
        BookingOutcome::Booked { uri } => println!("\nBooking confirmed: {}", uri),
        BookingOutcome::LinkGenerated { booking_link, reason } => {
            println!("\nDirect booking not possible ({}).", reason);
            println!("Pre-filled link: {}", booking_link);
        }
    }
    Ok(())
}
