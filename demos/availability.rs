use court_availability::{AvailabilityClient, Bookings, Config, DateSelector};
use tracing_subscriber::EnvFilter;

/// Print the courts grid for today, or for each `DD/MM/YYYY` argument.
#[tokio::main]
async fn main() -> court_availability::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = AvailabilityClient::new(Config::from_env()?);
    let bookings = Bookings::with_selector(client, DateSelector::new());

    let dates = std::env::args()
        .skip(1)
        .map(|arg| court_availability::parse_request_date(&arg))
        .collect::<court_availability::Result<Vec<_>>>()?;

    bookings.mount().await?;
    if dates.is_empty() {
        print(&bookings);
    }
    for date in dates {
        bookings.select_date(date).await?;
        print(&bookings);
    }
    Ok(())
}

fn print(bookings: &Bookings<AvailabilityClient>) {
    println!(
        "Badminton Court Availability - {}",
        court_availability::format_request_date(bookings.selected_date())
    );
    println!("{}\n", bookings.view());
}
