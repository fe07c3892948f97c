use crate::app::Locale;

/// Default validation messages for a locale.
///
/// Rules carrying their own `message` never consult the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: Locale,
}

impl MessageCatalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn required(&self, field: &str) -> String {
        match self.locale {
            Locale::Ko => format!("{}은(는) 필수입니다.", field),
            Locale::En => format!("{} is required.", field),
        }
    }

    pub fn min_length(&self, field: &str, min: usize) -> String {
        match self.locale {
            Locale::Ko => format!("{}은(는) 최소 {}자 이상이어야 합니다.", field, min),
            Locale::En => format!("{} must be at least {} characters.", field, min),
        }
    }

    pub fn max_length(&self, field: &str, max: usize) -> String {
        match self.locale {
            Locale::Ko => format!("{}은(는) 최대 {}자까지 입력 가능합니다.", field, max),
            Locale::En => format!("{} must be at most {} characters.", field, max),
        }
    }

    pub fn pattern(&self, field: &str) -> String {
        match self.locale {
            Locale::Ko => format!("{}의 형식이 올바르지 않습니다.", field),
            Locale::En => format!("{} has an invalid format.", field),
        }
    }

    pub fn custom(&self, field: &str) -> String {
        match self.locale {
            Locale::Ko => format!("{}의 값이 유효하지 않습니다.", field),
            Locale::En => format!("{} has an invalid value.", field),
        }
    }

    /// Message used when a custom check itself fails to run
    pub fn check_failed(&self, field: &str) -> String {
        match self.locale {
            Locale::Ko => format!("{}의 값을 검증할 수 없습니다.", field),
            Locale::En => format!("{} could not be validated.", field),
        }
    }
}
