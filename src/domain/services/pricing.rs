use crate::domain::models::catalog::{rule_kind, PricingRule};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

/// Equipment line as seen by the calculator: quantity times resolved unit
/// price. Resolution of ids to prices happens in the caller.
pub struct EquipmentLineInput {
    pub quantity: i64,
    pub unit_price: f64,
}

/// Computes the total price for a booking starting at `booking_start`
/// (facility-local time).
///
/// Rules apply cumulatively in input order; each matching rule applies
/// `price = price * multiplier + surcharge`. Scope filtering (facility,
/// court type) is the caller's job; only the time predicate is evaluated
/// here. Inputs are assumed valid; the function is a pure mapping of its
/// arguments.
pub fn compute_total(
    base_price: f64,
    rules: &[PricingRule],
    booking_start: NaiveDateTime,
    equipment: &[EquipmentLineInput],
    coach_price: f64,
) -> f64 {
    let mut price = base_price;
    // 0 = Sunday .. 6 = Saturday
    let day = booking_start.weekday().num_days_from_sunday() as i64;
    let booking_minutes = (booking_start.hour() * 60 + booking_start.minute()) as i64;

    for rule in rules {
        match rule.kind.as_str() {
            rule_kind::WEEKEND => {
                let matches_day = match rule.day_of_week {
                    Some(configured) => day == configured,
                    None => day == 0 || day == 6,
                };
                if matches_day {
                    price = price * rule.multiplier + rule.surcharge;
                }
            }
            rule_kind::PEAK_HOUR | rule_kind::TIME_BASED => {
                if let (Some(start), Some(end)) = (&rule.window_start, &rule.window_end) {
                    if let (Ok(start), Ok(end)) = (
                        NaiveTime::parse_from_str(start, "%H:%M"),
                        NaiveTime::parse_from_str(end, "%H:%M"),
                    ) {
                        let start_minutes = (start.hour() * 60 + start.minute()) as i64;
                        let end_minutes = (end.hour() * 60 + end.minute()) as i64;
                        if booking_minutes >= start_minutes && booking_minutes < end_minutes {
                            price = price * rule.multiplier + rule.surcharge;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    for line in equipment {
        price += line.quantity as f64 * line.unit_price;
    }

    price + coach_price
}
