//! Ticket category registry.
//!
//! Categories are statically enumerated in rank order; the rank drives which
//! permission tier must be present on a role for it to be mentioned on (and
//! able to see) the resulting ticket. The ordering is total and fixed at
//! compile time, and the requirement predicates are monotonic over it.

use crate::PermissionTier;
use strum::IntoEnumIterator;

/// A ranked ticket classification.
///
/// Variant order is the rank order; comparisons between categories compare
/// ranks directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
pub enum Category {
    /// Suggestions anyone may raise.
    GeneralSuggestion,
    /// General support questions.
    GeneralSupport,
    /// Support questions about a specific user.
    UserSupport,
    /// Suggestions about a specific user.
    UserSuggestion,
    /// Suggestions for the moderation team.
    ModSuggestion,
    /// Moderation support questions.
    ModSupport,
    /// Suggestions for the wider staff team.
    StaffSuggestion,
    /// Staff support questions.
    StaffSupport,
    /// Suggestions for administrators.
    AdminSuggestion,
    /// Administrator support questions.
    AdminSupport,
    /// Suggestions for the guild owner.
    OwnerSuggestion,
    /// Owner support questions.
    OwnerSupport,
}

/// First rank whose tickets are out of reach for plain moderators.
pub const STAFF_THRESHOLD: Category = Category::StaffSupport;
/// First rank whose tickets are out of reach for staff.
pub const ADMIN_THRESHOLD: Category = Category::AdminSupport;
/// First rank reserved for the guild owner.
pub const OWNER_THRESHOLD: Category = Category::OwnerSupport;

impl Category {
    /// True if moderators may handle tickets of this category.
    pub fn requires_mod(self) -> bool {
        self < STAFF_THRESHOLD
    }

    /// True if staff may handle tickets of this category.
    pub fn requires_staff(self) -> bool {
        self < ADMIN_THRESHOLD
    }

    /// True if administrators may handle tickets of this category.
    pub fn requires_admin(self) -> bool {
        self < OWNER_THRESHOLD
    }

    /// True if the ticket should be escalated to the guild owner.
    pub fn requires_owner(self) -> bool {
        self >= ADMIN_THRESHOLD
    }

    /// Display metadata for this category.
    pub fn info(self) -> CategoryInfo {
        match self {
            Category::GeneralSuggestion => CategoryInfo::new("general-suggestion", "General suggestion"),
            Category::GeneralSupport => CategoryInfo::new("general-support", "General support questions"),
            Category::UserSupport => CategoryInfo::new("user-support", "User support questions"),
            Category::UserSuggestion => CategoryInfo::new("user-suggestion", "User suggestion"),
            Category::ModSuggestion => CategoryInfo::new("mod-suggestion", "Mod suggestion"),
            Category::ModSupport => CategoryInfo::new("mod-support", "Moderation support questions"),
            Category::StaffSuggestion => CategoryInfo::new("staff-suggestion", "Mod/Admin suggestion"),
            Category::StaffSupport => CategoryInfo::new("staff-support", "Mod/Admin support questions"),
            Category::AdminSuggestion => CategoryInfo::new("admin-suggestion", "Admin suggestion"),
            Category::AdminSupport => CategoryInfo::new("admin-support", "Admin support questions"),
            Category::OwnerSuggestion => CategoryInfo::new("owner-suggestion", "Owner suggestion"),
            Category::OwnerSupport => CategoryInfo::new("owner-support", "Owner support questions"),
        }
    }

    /// Map this category to the autocomplete choice shape consumed by the
    /// command surface: display title as the name, description as the value.
    pub fn to_choice(self) -> CategoryChoice {
        let info = self.info();
        CategoryChoice {
            name: info.title.to_string(),
            value: info.description.to_string(),
        }
    }

    /// All categories in rank order.
    pub fn all() -> impl Iterator<Item = Category> {
        Category::iter()
    }
}

/// Display metadata for a ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Short slug shown in choice lists.
    pub title: &'static str,
    /// Human-readable description; doubles as the submitted option value.
    pub description: &'static str,
}

impl CategoryInfo {
    const fn new(title: &'static str, description: &'static str) -> Self {
        Self { title, description }
    }
}

/// One autocomplete choice entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    /// Display name presented to the user.
    pub name: String,
    /// Value submitted back when the choice is picked.
    pub value: String,
}

/// Look up a category by its submitted description string.
///
/// Returns `None` when nothing matches; callers surface that to the user as
/// a recoverable condition.
pub fn find_by_description(description: &str) -> Option<Category> {
    Category::all().find(|c| c.info().description == description)
}

/// Filter category choices whose display name contains the query substring.
///
/// An empty query keeps every choice.
pub fn filter_choices(query: &str) -> Vec<CategoryChoice> {
    Category::all()
        .map(Category::to_choice)
        .filter(|c| c.name.contains(query))
        .collect()
}

/// Map a category's requirement predicates to the tier set consumed by the
/// overwrite builder.
///
/// Staff and owner concerns fall to administrators until distinct staff and
/// owner tiers exist. Categories below the staff threshold default to
/// moderation.
pub fn determine_role_filter(category: Category) -> Vec<PermissionTier> {
    let mut tiers = Vec::new();
    if category.requires_owner() || !category.requires_mod() {
        tiers.push(PermissionTier::Administration);
    }
    if tiers.is_empty() {
        tiers.push(PermissionTier::Moderation);
    }
    tiers
}
