use anyhow::Result;

use harmattan_core::{Config, SessionController, SessionState};

#[tokio::main]
async fn main() -> Result<()> {
    harmattan_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let session = SessionController::new(&config)?;

    // Cold start: persisted city, or the configured default
    session.start().await;

    // Optional city argument: resolve it and select the first candidate,
    // the same path a search UI would drive.
    if let Some(query) = std::env::args().nth(1) {
        session.on_toggle_search();
        session.on_search_text_changed(&query);
        tokio::time::sleep(std::time::Duration::from_millis(
            config.search.debounce_ms + 500,
        ))
        .await;

        let candidates = session.state().candidates;
        match candidates.first() {
            Some(candidate) => {
                tracing::info!("resolved {:?} to {}", query, candidate.display_label());
                session.on_location_selected(candidate).await;
            }
            None => {
                session.on_toggle_search();
                println!("No locations matched {:?}", query);
            }
        }
    }

    render(&session.state());
    Ok(())
}

/// Minimal text rendering of the controller state: current conditions plus
/// the daily forecast strip.
fn render(state: &SessionState) {
    if let Some(message) = &state.last_error {
        eprintln!("! {}", message);
    }

    let Some(forecast) = &state.forecast else {
        println!("No forecast available.");
        return;
    };

    println!("{}", forecast.location.display_label());
    println!(
        "  {:.0}°C  {}  wind {:.1} km/h  humidity {}%",
        forecast.current.temp_c,
        forecast.current.condition,
        forecast.current.wind_kph,
        forecast.current.humidity_pct,
    );
    if let Some(today) = forecast.today() {
        println!("  sunrise {}  sunset {}", today.sunrise, today.sunset);
    }

    println!("Daily forecast:");
    for day in &forecast.days {
        println!(
            "  {}  {:>5.1}°C  {}",
            day.date.format("%A"),
            day.avg_temp_c,
            day.condition,
        );
    }
}
