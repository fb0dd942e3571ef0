//! Every structural locator the workflow depends on, keyed by the role the
//! element plays. When the portal or Remine markup changes, only
//! [`SiteMap::remine`] needs editing.

use std::collections::HashMap;
use std::fmt;

/// How an element is found on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Name(String),
    Id(String),
    ClassName(String),
    /// Anchor whose visible text equals the value
    LinkText(String),
    Css(String),
    XPath(String),
}

/// Query form accepted by the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn to_query(&self) -> Query {
        match self {
            Locator::Name(name) => Query::Css(format!("[name=\"{}\"]", name)),
            Locator::Id(id) => Query::Css(format!("#{}", id)),
            Locator::ClassName(class) => Query::Css(format!(".{}", class)),
            Locator::LinkText(text) => Query::XPath(format!("//a[normalize-space(.)=\"{}\"]", text)),
            Locator::Css(css) => Query::Css(css.clone()),
            Locator::XPath(xpath) => Query::XPath(xpath.clone()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(v) => write!(f, "name={}", v),
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::ClassName(v) => write!(f, "class={}", v),
            Locator::LinkText(v) => write!(f, "link text={}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
        }
    }
}

/// Page elements the workflow touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    LoginUsername,
    LoginPassword,
    LoginSubmit,
    ProductsMenu,
    RemineLink,
    SearchField,
    AddressResult,
    SelectAllToggle,
    SeeAllButton,
    PublicRecords,
}

impl Role {
    pub const ALL: [Role; 10] = [
        Role::LoginUsername,
        Role::LoginPassword,
        Role::LoginSubmit,
        Role::ProductsMenu,
        Role::RemineLink,
        Role::SearchField,
        Role::AddressResult,
        Role::SelectAllToggle,
        Role::SeeAllButton,
        Role::PublicRecords,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::LoginUsername => "login username field",
            Role::LoginPassword => "login password field",
            Role::LoginSubmit => "login button",
            Role::ProductsMenu => "products menu",
            Role::RemineLink => "Remine link",
            Role::SearchField => "Remine search field",
            Role::AddressResult => "address search result",
            Role::SelectAllToggle => "select-all properties toggle",
            Role::SeeAllButton => "public records 'See all' button",
            Role::PublicRecords => "public records section",
        };
        f.write_str(name)
    }
}

const PROPERTY_ARTICLE: &str =
    "//*[@id=\"RemineBodyContainer\"]/div/div/div/div[3]/div[1]/div[1]/div[2]/div/div/div/div/article/section[4]";

#[derive(Debug, Clone)]
pub struct SiteMap {
    locators: HashMap<Role, Locator>,
}

impl SiteMap {
    /// Locators for the MLS portal login and the Remine property pages
    pub fn remine() -> Self {
        let locators = HashMap::from([
            (Role::LoginUsername, Locator::Name("loginId".to_string())),
            (Role::LoginPassword, Locator::Name("password".to_string())),
            (Role::LoginSubmit, Locator::Id("btn-login".to_string())),
            (Role::ProductsMenu, Locator::ClassName("dropbtn".to_string())),
            (Role::RemineLink, Locator::LinkText("Remine".to_string())),
            (Role::SearchField, Locator::Id("remine-smarter-search".to_string())),
            (
                Role::AddressResult,
                Locator::Css(
                    "button[data-re-id=\"Core-Rediscover-Search-Result-Item-Button-0-Addresses\"]".to_string(),
                ),
            ),
            (
                Role::SelectAllToggle,
                Locator::Css("button[data-re-id=\"Core-Rediscover-SelectAllProperties-FloatingToggle\"]".to_string()),
            ),
            (
                Role::SeeAllButton,
                Locator::XPath(format!("{}/div/div[3]/button", PROPERTY_ARTICLE)),
            ),
            (
                Role::PublicRecords,
                Locator::XPath(format!("{}/div/div[1]/div/div/div", PROPERTY_ARTICLE)),
            ),
        ]);

        Self { locators }
    }

    /// Replace the locator for one role
    pub fn with(mut self, role: Role, locator: Locator) -> Self {
        self.locators.insert(role, locator);
        self
    }

    pub fn locator(&self, role: Role) -> &Locator {
        // remine() fills every role and with() only replaces
        &self.locators[&role]
    }
}

impl Default for SiteMap {
    fn default() -> Self {
        Self::remine()
    }
}
