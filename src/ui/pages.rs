use std::fmt::Write;

use crate::client::TranslationState;

/// Navigable views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Page1,
    Page2,
    Page3,
    Admin,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Page1, Route::Page2, Route::Page3, Route::Admin];

    /// Resolve a path; the empty path and unknown paths land on page 1
    pub fn resolve(path: &str) -> Route {
        match path.trim().trim_matches('/') {
            "page1" => Route::Page1,
            "page2" => Route::Page2,
            "page3" => Route::Page3,
            "admin" => Route::Admin,
            _ => Route::Page1,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Page1 => "/page1",
            Route::Page2 => "/page2",
            Route::Page3 => "/page3",
            Route::Admin => "/admin",
        }
    }

    /// Translation key of the navigation label
    pub fn nav_key(&self) -> &'static str {
        match self {
            Route::Page1 => "nav.page1",
            Route::Page2 => "nav.page2",
            Route::Page3 => "nav.page3",
            Route::Admin => "nav.admin",
        }
    }
}

struct PageContent {
    title: &'static str,
    subtitle: &'static str,
    paragraphs: &'static [&'static str],
    features: &'static [(&'static str, &'static str)],
}

const PAGE1: PageContent = PageContent {
    title: "page1.title",
    subtitle: "page1.subtitle",
    paragraphs: &["page1.intro"],
    features: &[
        ("page1.feature1.title", "page1.feature1.text"),
        ("page1.feature2.title", "page1.feature2.text"),
        ("page1.feature3.title", "page1.feature3.text"),
        ("page1.feature4.title", "page1.feature4.text"),
    ],
};

const PAGE2: PageContent = PageContent {
    title: "page2.title",
    subtitle: "page2.subtitle",
    paragraphs: &["page2.paragraph1", "page2.paragraph2", "page2.paragraph3"],
    features: &[],
};

const PAGE3: PageContent = PageContent {
    title: "page3.title",
    subtitle: "page3.subtitle",
    paragraphs: &["page3.contact", "page3.address", "page3.email"],
    features: &[],
};

/// Icon for the feature at `index` on page 1
pub fn feature_icon(index: usize) -> &'static str {
    const ICONS: [&str; 4] = ["bi-translate", "bi-arrow-repeat", "bi-person-check", "bi-laptop"];
    ICONS.get(index).copied().unwrap_or("bi-star")
}

/// Render a visitor page in the active language.
///
/// The admin route has its own view; here it renders only its title.
pub fn render_page(route: Route, state: &TranslationState) -> String {
    let content = match route {
        Route::Page1 => &PAGE1,
        Route::Page2 => &PAGE2,
        Route::Page3 => &PAGE3,
        Route::Admin => return format!("{}\n", state.translate("admin.title")),
    };

    let mut out = String::new();
    let title = state.translate(content.title);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out, "{}\n", state.translate(content.subtitle));

    for key in content.paragraphs {
        let _ = writeln!(out, "{}\n", state.translate(key));
    }

    for (index, (title_key, text_key)) in content.features.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            feature_icon(index),
            state.translate(title_key),
            state.translate(text_key)
        );
    }

    out
}
