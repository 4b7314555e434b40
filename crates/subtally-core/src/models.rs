//! Domain models for subtally

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Billing period of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Recurrence {
    pub const ALL: [Recurrence; 4] = [
        Self::Monthly,
        Self::Quarterly,
        Self::Semiannual,
        Self::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semiannual => "semiannual",
            Self::Annual => "annual",
        }
    }

    /// Length of one billing cycle in calendar months
    pub fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Semiannual => 6,
            Self::Annual => 12,
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "mensal" => Ok(Self::Monthly),
            "quarterly" | "trimestral" => Ok(Self::Quarterly),
            "semiannual" | "semi-annual" | "semestral" => Ok(Self::Semiannual),
            "annual" | "yearly" | "anual" => Ok(Self::Annual),
            _ => Err(format!(
                "Unknown recurrence: {} (valid: monthly, quarterly, semiannual, annual)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending category of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Streaming,
    Music,
    Software,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Streaming,
        Self::Music,
        Self::Software,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Music => "music",
            Self::Software => "software",
            Self::Education => "education",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Streaming => "Streaming",
            Self::Music => "Music",
            Self::Software => "Software",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "streaming" => Ok(Self::Streaming),
            "music" | "música" | "musica" => Ok(Self::Music),
            "software" => Ok(Self::Software),
            "education" | "educação" | "educacao" => Ok(Self::Education),
            "other" | "others" | "outros" => Ok(Self::Other),
            _ => Err(format!(
                "Unknown category: {} (valid: streaming, music, software, education, other)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked recurring subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub value: Decimal,
    pub recurrence: Recurrence,
    pub first_charge_date: NaiveDate,
    /// Date the next charge is due; moves forward on every registered payment
    pub next_charge_date: NaiveDate,
    pub category: Category,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Inactive subscriptions are kept for history but never aggregated
    pub is_active: bool,
    /// Whether the most recent cycle's charge has been acknowledged
    pub is_paid: bool,
    /// Optimistic-concurrency counter, bumped on every write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A subscription to be created (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub value: Decimal,
    pub recurrence: Recurrence,
    pub first_charge_date: NaiveDate,
    pub category: Category,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl NewSubscription {
    /// Check field-level invariants before the record reaches storage
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_value(self.value)
    }
}

/// Partial edit of a subscription; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub value: Option<Decimal>,
    pub recurrence: Option<Recurrence>,
    pub first_charge_date: Option<NaiveDate>,
    pub next_charge_date: Option<NaiveDate>,
    pub category: Option<Category>,
    /// `Some(None)` clears the field
    pub payment_method: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub is_paid: Option<bool>,
}

impl SubscriptionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.value.is_none()
            && self.recurrence.is_none()
            && self.first_charge_date.is_none()
            && self.next_charge_date.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
            && self.notes.is_none()
            && self.is_paid.is_none()
    }

    /// Apply the edit onto an existing record, validating the changed fields
    pub fn apply_to(&self, sub: &mut Subscription) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
            sub.name = name.trim().to_string();
        }
        if let Some(value) = self.value {
            validate_value(value)?;
            sub.value = value;
        }
        if let Some(recurrence) = self.recurrence {
            sub.recurrence = recurrence;
        }
        if let Some(date) = self.first_charge_date {
            sub.first_charge_date = date;
        }
        if let Some(date) = self.next_charge_date {
            sub.next_charge_date = date;
        }
        if let Some(category) = self.category {
            sub.category = category;
        }
        if let Some(method) = &self.payment_method {
            sub.payment_method = method.clone();
        }
        if let Some(notes) = &self.notes {
            sub.notes = notes.clone();
        }
        if let Some(paid) = self.is_paid {
            sub.is_paid = paid;
        }
        Ok(())
    }
}

/// Which subscriptions a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    Active,
    Inactive,
    All,
}

/// Reject an empty or missing owner key
pub fn validate_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(Error::Validation("owner is required".to_string()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(
            "subscription name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Largest accepted subscription value or goal limit (one billion)
///
/// Sums, annual multiples and ratios of amounts up to this stay inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

pub(crate) fn validate_value(value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "subscription value must be positive, got {}",
            value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "subscription value must not exceed {}, got {}",
            MAX_AMOUNT, value
        )));
    }
    Ok(())
}

/// A monthly spending ceiling for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingGoal {
    pub category: Category,
    /// Zero means no goal set
    pub monthly_limit: Decimal,
}

impl SpendingGoal {
    pub fn new(category: Category, monthly_limit: Decimal) -> Result<Self> {
        if monthly_limit < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "goal for {} must not be negative, got {}",
                category, monthly_limit
            )));
        }
        if monthly_limit > MAX_AMOUNT {
            return Err(Error::Validation(format!(
                "goal for {} must not exceed {}, got {}",
                category, MAX_AMOUNT, monthly_limit
            )));
        }
        Ok(Self {
            category,
            monthly_limit,
        })
    }
}

/// A registered payment (history of advanced charge dates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub subscription_id: i64,
    /// The charge date that was paid
    pub charge_date: NaiveDate,
    /// Subscription value at payment time
    pub amount: Decimal,
    /// The date the subscription advanced to
    pub next_charge_date: NaiveDate,
    pub paid_at: DateTime<Utc>,
}

/// Kind of a logged notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Success,
    Failure,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reminder" => Ok(Self::Reminder),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            _ => Err(format!("Unknown notification kind: {}", s)),
        }
    }
}

/// A notification in the reminder history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLog {
    pub id: i64,
    pub subscription_name: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

// ========== Report Models ==========

/// Spend of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total_value: Decimal,
    pub count: i64,
}

/// Raw (un-normalized) spend grouped by category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total_general: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

/// How category expense is measured against a monthly goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalBasis {
    /// Sum raw subscription values regardless of period
    #[default]
    Raw,
    /// Sum monthly equivalents
    MonthlyEquivalent,
}

/// Goal classification of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalState {
    WithinGoal,
    NearLimit,
    Exceeded,
    GoalNotSet,
}

impl GoalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinGoal => "within_goal",
            Self::NearLimit => "near_limit",
            Self::Exceeded => "exceeded",
            Self::GoalNotSet => "goal_not_set",
        }
    }
}

impl std::fmt::Display for GoalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goal-vs-actual progress of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalStatus {
    pub category: Category,
    pub expense: Decimal,
    pub monthly_limit: Decimal,
    /// expense / limit, zero when no limit is set
    pub progress: Decimal,
    pub status: GoalState,
}

/// Projected charges falling in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: u32,
    pub total: Decimal,
    pub charge_count: i64,
}

/// Month-by-month projected spend for a calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: i32,
    pub months: Vec<MonthTotal>,
    pub total: Decimal,
}

/// A payment reminder due to be scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub subscription_id: i64,
    pub subscription_name: String,
    pub next_charge_date: NaiveDate,
    pub value: Decimal,
    /// Day the reminder should fire
    pub remind_on: NaiveDate,
    /// Days between `remind_on` and the charge
    pub days_until: i64,
}

impl Reminder {
    pub fn title(&self) -> &'static str {
        "Payment reminder"
    }

    pub fn message(&self) -> String {
        format!(
            "{} is due in {} days ({}). Value: {:.2}",
            self.subscription_name, self.days_until, self.next_charge_date, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_recurrence_parse_accepts_source_labels() {
        assert_eq!(Recurrence::from_str("Mensal").unwrap(), Recurrence::Monthly);
        assert_eq!(
            Recurrence::from_str("trimestral").unwrap(),
            Recurrence::Quarterly
        );
        assert_eq!(
            Recurrence::from_str("Semestral").unwrap(),
            Recurrence::Semiannual
        );
        assert_eq!(Recurrence::from_str("ANUAL").unwrap(), Recurrence::Annual);
        assert!(Recurrence::from_str("weekly").is_err());
    }

    #[test]
    fn test_category_parse_round_trips_as_str() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
        assert_eq!(Category::from_str("Música").unwrap(), Category::Music);
        assert_eq!(Category::from_str("Educação").unwrap(), Category::Education);
        assert_eq!(Category::from_str("Outros").unwrap(), Category::Other);
        assert!(Category::from_str("gaming").is_err());
    }

    fn new_sub(name: &str, value: Decimal) -> NewSubscription {
        NewSubscription {
            name: name.to_string(),
            value,
            recurrence: Recurrence::Monthly,
            first_charge_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: Category::Streaming,
            payment_method: None,
            notes: None,
        }
    }

    #[test]
    fn test_new_subscription_validation() {
        assert!(new_sub("Netflix", Decimal::new(3990, 2)).validate().is_ok());
        assert!(matches!(
            new_sub("   ", Decimal::new(3990, 2)).validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            new_sub("Netflix", Decimal::ZERO).validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            new_sub("Netflix", Decimal::new(-1, 0)).validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_value_upper_bound() {
        assert!(new_sub("Fleet licence", MAX_AMOUNT).validate().is_ok());
        assert!(matches!(
            new_sub("Fleet licence", MAX_AMOUNT + Decimal::new(1, 2)).validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            new_sub("Fleet licence", Decimal::MAX).validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_goal_rejects_negative_limit() {
        assert!(SpendingGoal::new(Category::Music, Decimal::ZERO).is_ok());
        assert!(SpendingGoal::new(Category::Music, Decimal::new(-5, 0)).is_err());
        assert!(SpendingGoal::new(Category::Music, MAX_AMOUNT).is_ok());
        assert!(SpendingGoal::new(Category::Music, Decimal::MAX).is_err());
    }

    #[test]
    fn test_owner_required() {
        assert!(validate_owner("alice").is_ok());
        assert!(matches!(validate_owner(""), Err(Error::Validation(_))));
        assert!(matches!(validate_owner("  "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_reminder_message() {
        let reminder = Reminder {
            subscription_id: 1,
            subscription_name: "Spotify".to_string(),
            next_charge_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            value: Decimal::new(2190, 2),
            remind_on: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
            days_until: 3,
        };
        assert_eq!(
            reminder.message(),
            "Spotify is due in 3 days (2024-05-10). Value: 21.90"
        );
    }
}
