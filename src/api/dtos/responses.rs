use crate::domain::models::reservation::{EquipmentLine, Reservation};
use crate::domain::services::slots::Slot;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct PriceBreakdownView {
    pub base_price: f64,
    pub equipment_cost: f64,
    pub coach_cost: f64,
    pub total_price: f64,
}

#[derive(Serialize)]
pub struct EquipmentLineView {
    pub equipment_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Serialize)]
pub struct ReservationResponse {
    pub id: String,
    pub reference: String,
    pub status: String,
    pub payment_status: String,
    pub court_id: String,
    pub coach_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub breakdown: PriceBreakdownView,
    pub equipment: Vec<EquipmentLineView>,
}

impl ReservationResponse {
    pub fn from_parts(reservation: &Reservation, lines: &[EquipmentLine]) -> Self {
        Self {
            id: reservation.id.clone(),
            reference: reservation.reference.clone(),
            status: reservation.status.clone(),
            payment_status: reservation.payment_status.clone(),
            court_id: reservation.court_id.clone(),
            coach_id: reservation.coach_id.clone(),
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            breakdown: PriceBreakdownView {
                base_price: reservation.base_price,
                equipment_cost: reservation.equipment_cost,
                coach_cost: reservation.coach_cost,
                total_price: reservation.total_price,
            },
            equipment: lines
                .iter()
                .map(|line| EquipmentLineView {
                    equipment_id: line.equipment_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.quantity as f64 * line.unit_price,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct CancellationResponse {
    pub reservation_id: String,
    pub status: String,
    pub refund_amount: f64,
    pub refund_percentage: i64,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub court_id: String,
    pub date: String,
    pub slots: Vec<Slot>,
}
