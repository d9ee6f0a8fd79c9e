use std::fmt::{self, Write};

use weatherstack_core::{HistoricalResponse, HistoricalWeather, HourlyWeather};

/// Plain-text report: a location header, then one block per day.
pub fn render<W: Write>(out: &mut W, response: &HistoricalResponse) -> fmt::Result {
    let location = &response.location;

    writeln!(out, "{}, {} ({})", location.name, location.country, location.region)?;
    writeln!(
        out,
        "Local time {} (UTC{}{})",
        location.localtime,
        if location.utc_offset.starts_with('-') { "" } else { "+" },
        location.utc_offset
    )?;

    for (date, day) in response.days() {
        writeln!(out)?;
        writeln!(out, "{date}")?;
        render_day(out, day, &response.request.unit)?;
    }

    Ok(())
}

fn render_day<W: Write>(out: &mut W, day: &HistoricalWeather, unit: &str) -> fmt::Result {
    let degrees = degree_suffix(unit);
    writeln!(
        out,
        "  temp {}{d} / {}{d} / {}{d} (min/avg/max), sun {:.1} h, snow {:.1}, uv {}",
        day.mintemp,
        day.avgtemp,
        day.maxtemp,
        day.sunhour,
        day.totalsnow,
        day.uv_index,
        d = degrees,
    )?;
    writeln!(
        out,
        "  sun {} - {}, moon {} ({}%)",
        day.astro.sunrise, day.astro.sunset, day.astro.moon_phase, day.astro.moon_illumination
    )?;

    for slot in &day.hourly {
        render_slot(out, slot, degrees)?;
    }

    Ok(())
}

fn render_slot<W: Write>(out: &mut W, slot: &HourlyWeather, degrees: &str) -> fmt::Result {
    let time = slot
        .time_of_day()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| slot.time.clone());
    let description = slot.weather_descriptions.join(", ");

    writeln!(
        out,
        "    {time}  {:>4}{degrees}  wind {:>3} {:<3}  rain {:>3}%  {description}",
        slot.temperature, slot.wind_speed, slot.wind_dir, slot.chanceofrain,
    )
}

fn degree_suffix(unit: &str) -> &'static str {
    match unit {
        "f" => "°F",
        "s" => "K",
        _ => "°C",
    }
}
