//! # Seed Data
//!
//! Hardcoded defaults served when the menu or board tables are empty.
//! The menu defaults are synthesized at read time and never persisted
//! implicitly; the board defaults are inserted exactly once by the
//! explicit ensure-seeded step.

use crate::models::LinkType;

/// Key of the menu that drives the primary navigation.
pub const MAIN_MENU_KEY: &str = "main";
/// Key of the footer menu.
pub const FOOTER_MENU_KEY: &str = "footer";

/// Human name for a menu key.
pub fn menu_name_for_key(key: &str) -> &'static str {
    if key == FOOTER_MENU_KEY {
        "Footer"
    } else {
        "Main"
    }
}

/// One synthesized entry of the default main menu.
#[derive(Debug, Clone, Copy)]
pub struct DefaultMenuItem {
    pub label: &'static str,
    pub href: &'static str,
    pub order: i64,
    pub requires_auth: bool,
    pub link_type: LinkType,
}

const fn category(label: &'static str, href: &'static str, order: i64) -> DefaultMenuItem {
    DefaultMenuItem {
        label,
        href,
        order,
        requires_auth: false,
        link_type: LinkType::Category,
    }
}

/// The default main navigation, mirrored by the seed binary.
pub const DEFAULT_MAIN_MENU: [DefaultMenuItem; 8] = [
    category("카지노", "/products/casino", 1),
    category("다낭 유흥", "/products/nightlife", 2),
    category("프로모션", "/products/promotion", 3),
    DefaultMenuItem {
        label: "VIP 여행",
        href: "/products/vip-trip",
        order: 4,
        requires_auth: true,
        link_type: LinkType::Category,
    },
    category("여행 TIP", "/products/tip", 5),
    category("호텔 & 풀빌라", "/products/hotel-villa", 6),
    category("골프 & 레저", "/products/golf", 7),
    DefaultMenuItem {
        label: "커뮤니티",
        href: "/community",
        order: 8,
        requires_auth: false,
        link_type: LinkType::Community,
    },
];

/// One entry of the default board set.
#[derive(Debug, Clone, Copy)]
pub struct DefaultBoard {
    pub key: &'static str,
    pub name: &'static str,
    pub order: i64,
}

/// Seeded exactly once, when the board table is empty.
pub const DEFAULT_BOARDS: [DefaultBoard; 2] = [
    DefaultBoard {
        key: "review",
        name: "후기",
        order: 1,
    },
    DefaultBoard {
        key: "free",
        name: "자유게시판",
        order: 2,
    },
];
