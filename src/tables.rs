use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use dayahead::core::{HourlyPrice, Prices};

/// Build the table of all hours in rank order.
///
/// The cheaper half of the hours is green, the hours before `current_hour` are dimmed.
pub fn build_prices_table(
    prices: &Prices,
    current_hour: DateTime<Utc>,
    cheapest: Option<&HourlyPrice>,
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Rank", "Date", "Start", prices.unit(), ""]);
    for hourly_price in prices {
        let start = hourly_price.time.with_timezone(&prices.timezone());
        let is_passed = hourly_price.time < current_hour;
        let is_cheapest = cheapest.is_some_and(|it| it.time == hourly_price.time);
        let is_cheaper_half = (hourly_price.rank as usize) * 2 <= prices.hours_available();

        let mut row = vec![
            Cell::new(format!("#{}", hourly_price.rank))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(start.format("%H:%M")),
            Cell::new(hourly_price.price)
                .set_alignment(CellAlignment::Right)
                .fg(if is_cheaper_half { Color::Green } else { Color::Red }),
            if is_cheapest {
                Cell::new("cheapest").fg(Color::Green).add_attribute(Attribute::Bold)
            } else if is_passed {
                Cell::new("passed")
            } else {
                Cell::new("")
            },
        ];
        if is_passed {
            row = row.into_iter().map(|cell| cell.add_attribute(Attribute::Dim)).collect();
        }
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use chrono_tz::Europe;
    use dayahead::{core::DecisionWindow, quantity::Price};

    use super::*;

    #[test]
    fn test_build_prices_table() -> dayahead::prelude::Result {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 11, 23, 0, 0).unwrap();
        let prices = Prices::from_rates(
            Europe::Brussels,
            "EUR/MWh",
            [
                (midnight, Price::from(50.0)),
                (midnight + TimeDelta::hours(1), Price::from(80.0)),
                (midnight + TimeDelta::hours(2), Price::from(30.0)),
            ],
        )?;
        let now = midnight + TimeDelta::hours(1);
        let window = DecisionWindow::between(now, now + TimeDelta::hours(1))?;
        let table = build_prices_table(&prices, now, prices.cheapest(window, now)).to_string();

        assert!(table.contains("EUR/MWh"));
        assert!(table.contains("Mar 12"));
        assert!(table.contains("02:00"));
        assert!(table.contains("30.00"));
        assert!(table.contains("cheapest"));
        assert!(table.contains("passed"));
        Ok(())
    }
}
