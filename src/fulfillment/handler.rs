use chrono::{DateTime, Utc};

use super::types::{FulfillmentEvent, FulfillmentResponse, LexMessage, ReservationRecord};
use crate::kernel::{DialogAction, DialogActionType};

pub const LAST_RESERVATION_ID: &str = "lastReservationId";
pub const LAST_RESERVATION_SUMMARY: &str = "lastReservationSummary";
pub const LAST_CANCELLED_RESERVATION_ID: &str = "lastCancelledReservationId";

pub const FULFILLED: &str = "Fulfilled";
pub const FAILED: &str = "Failed";

/// Handles one fulfillment code-hook call.
///
/// Reservations only live in session attributes; `now` seeds the reservation id.
pub fn fulfill(event: FulfillmentEvent, now: DateTime<Utc>) -> FulfillmentResponse {
    let intent_name = event.session_state.intent.name.clone().unwrap_or_default();

    match intent_name.as_str() {
        "MakeReservation" => make_reservation(event, now),
        "CancelReservation" => cancel_reservation(event),
        "CheckReservation" => check_reservation(event),
        "CourseInfo" => {
            let message = match event.session_state.intent.slot_value("CourseName") {
                Some(course) => format!(
                    "{} 과정은 주 2회/주 3회 선택 가능하고, 레벨 테스트 후 반 편성이 진행돼요(데모 안내).",
                    course
                ),
                None => "어떤 과정이 궁금하세요? 예: 토익, 회화, 자격증".to_string(),
            };
            close(event, FULFILLED, message)
        }
        "Help" => close(
            event,
            FULFILLED,
            "가능한 기능: 수강 상담, 예약, 예약 조회/취소. 예) '강남점 토익 예약하고 싶어'".to_string(),
        ),
        _ => close(
            event,
            FULFILLED,
            "죄송해요, 잘 이해하지 못했어요. '예약', '조회', '취소', '과정 안내' 중으로 다시 말씀해 주세요."
                .to_string(),
        ),
    }
}

/// `R-` + upper-case base36 of the epoch milliseconds.
pub fn reservation_id(now: DateTime<Utc>) -> String {
    format!("R-{}", to_base36(now.timestamp_millis().max(0) as u64).to_uppercase())
}

fn make_reservation(mut event: FulfillmentEvent, now: DateTime<Utc>) -> FulfillmentResponse {
    let intent = &event.session_state.intent;
    let owned = |slot: &str| intent.slot_value(slot).map(str::to_string);
    let record = ReservationRecord {
        reservation_id: reservation_id(now),
        branch: owned("Branch"),
        course: owned("CourseName"),
        date: owned("Date"),
        time: owned("Time"),
        name: owned("StudentName"),
        phone: owned("PhoneNumber"),
    };

    let message = format!(
        "예약 완료! 예약번호는 {} 입니다. ({} / {} / {} {})",
        record.reservation_id,
        record.branch.as_deref().unwrap_or("지점 미상"),
        record.course.as_deref().unwrap_or("과정 미상"),
        record.date.as_deref().unwrap_or("날짜 미상"),
        record.time.as_deref().unwrap_or("")
    );

    let attributes = &mut event.session_state.session_attributes;
    attributes.insert(LAST_RESERVATION_ID.to_string(), record.reservation_id.clone());
    attributes.insert(
        LAST_RESERVATION_SUMMARY.to_string(),
        serde_json::to_string(&record).unwrap_or_default(),
    );

    close(event, FULFILLED, message)
}

fn cancel_reservation(mut event: FulfillmentEvent) -> FulfillmentResponse {
    let Some(reservation_id) = target_reservation(&event) else {
        return close(
            event,
            FAILED,
            "취소할 예약번호를 찾지 못했어요. 예약번호를 알려주세요.".to_string(),
        );
    };

    event
        .session_state
        .session_attributes
        .insert(LAST_CANCELLED_RESERVATION_ID.to_string(), reservation_id.clone());
    close(event, FULFILLED, format!("예약({}) 취소가 완료됐어요.", reservation_id))
}

fn check_reservation(event: FulfillmentEvent) -> FulfillmentResponse {
    let Some(reservation_id) = target_reservation(&event) else {
        return close(
            event,
            FAILED,
            "조회할 예약번호를 찾지 못했어요. 예약번호를 알려주세요.".to_string(),
        );
    };

    let stored = event
        .session_state
        .session_attributes
        .get(LAST_RESERVATION_SUMMARY)
        .and_then(|raw| serde_json::from_str::<ReservationRecord>(raw).ok())
        .filter(|record| record.reservation_id == reservation_id);

    let message = match stored {
        Some(record) => format!(
            "예약 조회: {} / {} / {} {} (예약번호 {})",
            record.branch.as_deref().unwrap_or("지점"),
            record.course.as_deref().unwrap_or("과정"),
            record.date.as_deref().unwrap_or(""),
            record.time.as_deref().unwrap_or(""),
            reservation_id
        ),
        None => format!(
            "예약번호 {} 로 등록된 예약을 찾지 못했어요(데모 환경).",
            reservation_id
        ),
    };
    close(event, FULFILLED, message)
}

// Slot first, then the last reservation made in this session.
fn target_reservation(event: &FulfillmentEvent) -> Option<String> {
    event
        .session_state
        .intent
        .slot_value("ReservationId")
        .map(str::to_string)
        .or_else(|| {
            event
                .session_state
                .session_attributes
                .get(LAST_RESERVATION_ID)
                .filter(|v| !v.is_empty())
                .cloned()
        })
}

fn close(mut event: FulfillmentEvent, state: &str, message: String) -> FulfillmentResponse {
    event.session_state.intent.state = Some(state.to_string());
    event.session_state.dialog_action = Some(DialogAction::new(DialogActionType::Close));
    FulfillmentResponse {
        session_state: event.session_state,
        messages: vec![LexMessage::plain(message)],
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_295), "zz");
    }
}
