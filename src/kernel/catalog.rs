use std::collections::HashMap;

/// Fallback texts used when the recognizer sends no message for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPrompts {
    pub elicit: String,
    pub confirm: String,
    pub close: String,
    /// Placeholder for slots without their own placeholder entry.
    pub placeholder: String,
    /// Affirm/deny pair offered on ConfirmIntent.
    pub confirm_replies: [String; 2],
}

impl FallbackPrompts {
    pub fn korean() -> Self {
        Self {
            elicit: "값을 입력해 주세요.".to_string(),
            confirm: "진행할까요?".to_string(),
            close: "완료되었습니다.".to_string(),
            placeholder: "답변을 입력하세요".to_string(),
            confirm_replies: ["네".to_string(), "아니요".to_string()],
        }
    }

    pub fn english() -> Self {
        Self {
            elicit: "please provide a value".to_string(),
            confirm: "shall we proceed?".to_string(),
            close: "done.".to_string(),
            placeholder: "enter your answer".to_string(),
            confirm_replies: ["yes".to_string(), "no".to_string()],
        }
    }

    /// Picks the prompt language from a Lex locale id such as `ko_KR`.
    pub fn for_locale(locale_id: &str) -> Self {
        if locale_id.to_ascii_lowercase().starts_with("ko") {
            Self::korean()
        } else {
            Self::english()
        }
    }
}

impl Default for FallbackPrompts {
    fn default() -> Self {
        Self::korean()
    }
}

/// Static slot metadata shared by the UI mapper and the summary projector.
///
/// Built once at startup and passed by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    labels: HashMap<String, String>,
    placeholders: HashMap<String, String>,
    summary_order: Vec<String>,
    prompts: FallbackPrompts,
}

impl SlotCatalog {
    pub fn new(prompts: FallbackPrompts) -> Self {
        Self {
            labels: HashMap::new(),
            placeholders: HashMap::new(),
            summary_order: Vec::new(),
            prompts,
        }
    }

    /// Declares a slot. Declaration order is the summary order.
    pub fn with_slot(mut self, name: &str, label: &str, placeholder: Option<&str>) -> Self {
        self.labels.insert(name.to_string(), label.to_string());
        if let Some(placeholder) = placeholder {
            self.placeholders.insert(name.to_string(), placeholder.to_string());
        }
        if !self.summary_order.iter().any(|k| k == name) {
            self.summary_order.push(name.to_string());
        }
        self
    }

    pub fn with_prompts(mut self, prompts: FallbackPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// The reservation bot schema: branch, course, date, time, student, phone,
    /// reservation id.
    pub fn reservation() -> Self {
        Self::new(FallbackPrompts::korean())
            .with_slot("Branch", "지점", Some("지점을 입력하세요 (예: 강남점)"))
            .with_slot("CourseName", "과정", Some("과정을 입력하세요 (예: 토익)"))
            .with_slot("Date", "날짜", Some("날짜를 입력하세요 (예: 2월 10일)"))
            .with_slot("Time", "시간", Some("시간을 입력하세요 (예: 19:30)"))
            .with_slot("StudentName", "이름", Some("이름을 입력하세요 (예: 김도영)"))
            .with_slot(
                "PhoneNumber",
                "연락처",
                Some("연락처를 입력하세요 (예: 010-1234-5678)"),
            )
            .with_slot("ReservationId", "예약번호", Some("예약번호를 입력하세요"))
    }

    /// Display label, falling back to the raw slot name.
    pub fn label<'a>(&'a self, slot: &'a str) -> &'a str {
        self.labels.get(slot).map(String::as_str).unwrap_or(slot)
    }

    pub fn placeholder(&self, slot: &str) -> &str {
        self.placeholders
            .get(slot)
            .map(String::as_str)
            .unwrap_or(&self.prompts.placeholder)
    }

    pub fn summary_order(&self) -> &[String] {
        &self.summary_order
    }

    pub fn prompts(&self) -> &FallbackPrompts {
        &self.prompts
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::reservation()
    }
}
