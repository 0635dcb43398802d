//! Deterministic in-memory browser
//!
//! `ScriptedBrowser` implements [`BrowserDriver`] over a list of scripted
//! elements. It understands every [`ElementQuery`], including a small CSS
//! subset (`tag`, `#id`, `[attr="value"]`) and the XPath shapes produced by
//! selector synthesis (`//tag[@attr=...]`, `contains(text(), ...)`, `concat`).
//! Every call is logged so tests can assert on what was (not) attempted, and
//! any operation can be made to fail.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use waymark_core_types::{BoundingBox, ElementSnapshot};

use crate::errors::ActionError;
use crate::primitives::BrowserDriver;
use crate::types::{ElementHandle, ElementQuery, Viewport};

const HANDLE_PREFIX: &str = "scripted:";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// One logged driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Navigate(String),
    GoBack,
    GoForward,
    ClickAt(i32, i32),
    TypeAt {
        x: i32,
        y: i32,
        text: String,
        press_enter: bool,
        clear_first: bool,
    },
    ScrollBy(i32, i32),
    PressKey(String),
    VisibleText,
    Query(ElementQuery),
    IsVisible(String),
    Click(String),
    Clear(String),
    Fill(String, String),
    SelectOption(String, String),
    Press(String, String),
    ElementAt(i32, i32),
    Screenshot,
    ViewportSize,
}

impl DriverCall {
    /// Operation name used for failure injection.
    pub fn operation(&self) -> &'static str {
        match self {
            DriverCall::Navigate(_) => "navigate",
            DriverCall::GoBack => "go_back",
            DriverCall::GoForward => "go_forward",
            DriverCall::ClickAt(..) => "click_at",
            DriverCall::TypeAt { .. } => "type_at",
            DriverCall::ScrollBy(..) => "scroll_by",
            DriverCall::PressKey(_) => "press_key",
            DriverCall::VisibleText => "visible_text",
            DriverCall::Query(_) => "query",
            DriverCall::IsVisible(_) => "is_visible",
            DriverCall::Click(_) => "click",
            DriverCall::Clear(_) => "clear",
            DriverCall::Fill(..) => "fill",
            DriverCall::SelectOption(..) => "select_option",
            DriverCall::Press(..) => "press",
            DriverCall::ElementAt(..) => "element_at",
            DriverCall::Screenshot => "screenshot",
            DriverCall::ViewportSize => "viewport_size",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedElement {
    pub snapshot: ElementSnapshot,
    pub visible: bool,
    /// Current form value
    pub value: String,
    /// Option labels for `<select>` elements
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub clicks: u32,
    pub keys: Vec<String>,
}

impl ScriptedElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            snapshot: ElementSnapshot::new(tag),
            visible: true,
            value: String::new(),
            options: Vec::new(),
            selected: None,
            clicks: 0,
            keys: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.snapshot.text = text.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.snapshot.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.snapshot.bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn tag(&self) -> String {
        self.snapshot.normalized_tag()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.snapshot.attribute(name)
    }

    fn normalized_text(&self) -> String {
        normalize_ws(&self.snapshot.text)
    }

    fn accessible_name(&self) -> String {
        match self.snapshot.non_empty_attribute("aria-label") {
            Some(label) => normalize_ws(label),
            None => self.normalized_text(),
        }
    }
}

/// A page the scripted browser can navigate to.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    pub elements: Vec<ScriptedElement>,
    pub body_text: Option<String>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, element: ScriptedElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_body_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = Some(text.into());
        self
    }
}

#[derive(Default)]
struct State {
    url: String,
    page: ScriptedPage,
    routes: HashMap<String, ScriptedPage>,
    history: Vec<String>,
    position: usize,
    viewport: Viewport,
    calls: Vec<DriverCall>,
    failures: HashMap<String, ActionError>,
    focused: Option<usize>,
    scroll: (i32, i32),
    typed: Vec<String>,
    keys: Vec<String>,
}

/// In-memory [`BrowserDriver`] used by tests.
pub struct ScriptedBrowser {
    state: Mutex<State>,
}

impl Default for ScriptedBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                url: "about:blank".to_string(),
                ..State::default()
            }),
        }
    }

    pub fn with_viewport(self, viewport: Viewport) -> Self {
        self.state.lock().viewport = viewport;
        self
    }

    /// Add an element to the current page and return its index.
    pub fn add_element(&self, element: ScriptedElement) -> usize {
        let mut state = self.state.lock();
        state.page.elements.push(element);
        state.page.elements.len() - 1
    }

    pub fn set_body_text(&self, text: impl Into<String>) {
        self.state.lock().page.body_text = Some(text.into());
    }

    /// Page loaded when `url` is navigated to. Unknown URLs keep the current page.
    pub fn add_route(&self, url: impl Into<String>, page: ScriptedPage) {
        self.state.lock().routes.insert(url.into(), page);
    }

    /// Make every future call of `operation` fail with `error`.
    pub fn fail_on(&self, operation: &str, error: ActionError) {
        self.state.lock().failures.insert(operation.to_string(), error);
    }

    pub fn clear_failure(&self, operation: &str) {
        self.state.lock().failures.remove(operation);
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.lock().calls.clone()
    }

    pub fn count_calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn element(&self, index: usize) -> Option<ScriptedElement> {
        self.state.lock().page.elements.get(index).cloned()
    }

    pub fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    pub fn scroll_position(&self) -> (i32, i32) {
        self.state.lock().scroll
    }

    /// Text typed through coordinate input.
    pub fn typed_text(&self) -> Vec<String> {
        self.state.lock().typed.clone()
    }

    /// Keys pressed on the page keyboard.
    pub fn pressed_keys(&self) -> Vec<String> {
        self.state.lock().keys.clone()
    }

    fn record(&self, call: DriverCall) -> Result<parking_lot::MutexGuard<'_, State>, ActionError> {
        let mut state = self.state.lock();
        let operation = call.operation();
        state.calls.push(call);
        if let Some(error) = state.failures.get(operation) {
            return Err(error.clone());
        }
        Ok(state)
    }

    fn load(state: &mut State, url: &str) {
        state.url = url.to_string();
        if let Some(page) = state.routes.get(url) {
            state.page = page.clone();
            state.focused = None;
        }
    }
}

fn handle_for(index: usize) -> ElementHandle {
    ElementHandle::new(format!("{}{}", HANDLE_PREFIX, index))
}

fn index_of(state: &State, handle: &ElementHandle) -> Result<usize, ActionError> {
    handle
        .selector
        .strip_prefix(HANDLE_PREFIX)
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|index| *index < state.page.elements.len())
        .ok_or_else(|| ActionError::NotFound(format!("stale element handle {}", handle)))
}

fn element_at_point(state: &State, x: i32, y: i32) -> Option<usize> {
    state
        .page
        .elements
        .iter()
        .enumerate()
        .rev()
        .find(|(_, el)| {
            el.visible
                && el
                    .snapshot
                    .bounding_box
                    .map(|bbox| bbox.contains(x as f64, y as f64))
                    .unwrap_or(false)
        })
        .map(|(index, _)| index)
}

#[async_trait]
impl BrowserDriver for ScriptedBrowser {
    async fn navigate(&self, url: &str) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::Navigate(url.to_string()))?;
        if !state.history.is_empty() {
            let keep = state.position + 1;
            state.history.truncate(keep);
        }
        state.history.push(url.to_string());
        state.position = state.history.len() - 1;
        Self::load(&mut state, url);
        Ok(())
    }

    async fn go_back(&self) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::GoBack)?;
        if state.position > 0 {
            state.position -= 1;
            let url = state.history[state.position].clone();
            Self::load(&mut state, &url);
        }
        Ok(())
    }

    async fn go_forward(&self) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::GoForward)?;
        if state.position + 1 < state.history.len() {
            state.position += 1;
            let url = state.history[state.position].clone();
            Self::load(&mut state, &url);
        }
        Ok(())
    }

    async fn click_at(&self, x: i32, y: i32) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::ClickAt(x, y))?;
        let hit = element_at_point(&state, x, y);
        state.focused = hit;
        if let Some(index) = hit {
            state.page.elements[index].clicks += 1;
        }
        Ok(())
    }

    async fn type_at(
        &self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_first: bool,
    ) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::TypeAt {
            x,
            y,
            text: text.to_string(),
            press_enter,
            clear_first,
        })?;
        let hit = element_at_point(&state, x, y);
        state.focused = hit;
        if let Some(index) = hit {
            let element = &mut state.page.elements[index];
            if clear_first {
                element.value.clear();
            }
            element.value.push_str(text);
            if press_enter {
                element.keys.push("Enter".to_string());
            }
        }
        state.typed.push(text.to_string());
        Ok(())
    }

    async fn scroll_by(&self, dx: i32, dy: i32) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::ScrollBy(dx, dy))?;
        state.scroll.0 += dx;
        state.scroll.1 += dy;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::PressKey(key.to_string()))?;
        state.keys.push(key.to_string());
        if let Some(index) = state.focused {
            state.page.elements[index].keys.push(key.to_string());
        }
        Ok(())
    }

    async fn visible_text(&self) -> Result<String, ActionError> {
        let state = self.record(DriverCall::VisibleText)?;
        if let Some(text) = &state.page.body_text {
            return Ok(text.clone());
        }
        let text = state
            .page
            .elements
            .iter()
            .filter(|el| el.visible)
            .map(|el| el.snapshot.trimmed_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text)
    }

    async fn query(&self, query: &ElementQuery) -> Result<Option<ElementHandle>, ActionError> {
        let state = self.record(DriverCall::Query(query.clone()))?;
        let matcher = Matcher::compile(query)?;
        let elements = &state.page.elements;
        Ok(elements
            .iter()
            .position(|el| matcher.matches(el, elements))
            .map(handle_for))
    }

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool, ActionError> {
        let state = self.record(DriverCall::IsVisible(element.selector.clone()))?;
        let index = index_of(&state, element)?;
        Ok(state.page.elements[index].visible)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::Click(element.selector.clone()))?;
        let index = index_of(&state, element)?;
        if !state.page.elements[index].visible {
            return Err(ActionError::NotVisible(element.to_string()));
        }
        state.page.elements[index].clicks += 1;
        state.focused = Some(index);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::Clear(element.selector.clone()))?;
        let index = index_of(&state, element)?;
        state.page.elements[index].value.clear();
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, text: &str) -> Result<(), ActionError> {
        let mut state =
            self.record(DriverCall::Fill(element.selector.clone(), text.to_string()))?;
        let index = index_of(&state, element)?;
        state.page.elements[index].value = text.to_string();
        state.focused = Some(index);
        Ok(())
    }

    async fn select_option(
        &self,
        element: &ElementHandle,
        label: &str,
    ) -> Result<(), ActionError> {
        let mut state = self.record(DriverCall::SelectOption(
            element.selector.clone(),
            label.to_string(),
        ))?;
        let index = index_of(&state, element)?;
        let target = &mut state.page.elements[index];
        match target.options.iter().find(|option| option.trim() == label.trim()) {
            Some(option) => {
                target.selected = Some(option.clone());
                Ok(())
            }
            None => Err(ActionError::OptionNotFound(label.to_string())),
        }
    }

    async fn press(&self, element: &ElementHandle, key: &str) -> Result<(), ActionError> {
        let mut state =
            self.record(DriverCall::Press(element.selector.clone(), key.to_string()))?;
        let index = index_of(&state, element)?;
        state.page.elements[index].keys.push(key.to_string());
        Ok(())
    }

    async fn element_at(&self, x: i32, y: i32) -> Result<Option<ElementSnapshot>, ActionError> {
        let state = self.record(DriverCall::ElementAt(x, y))?;
        Ok(element_at_point(&state, x, y).map(|index| state.page.elements[index].snapshot.clone()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        let _state = self.record(DriverCall::Screenshot)?;
        Ok(PNG_MAGIC.to_vec())
    }

    async fn viewport_size(&self) -> Result<Viewport, ActionError> {
        let state = self.record(DriverCall::ViewportSize)?;
        Ok(state.viewport)
    }
}

fn normalize_ws(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    normalize_ws(haystack)
        .to_lowercase()
        .contains(&normalize_ws(needle).to_lowercase())
}

/// Compiled form of an [`ElementQuery`].
enum Matcher<'q> {
    Query(&'q ElementQuery),
    Css(CssSelector),
    XPath(XPathSelector),
}

impl<'q> Matcher<'q> {
    fn compile(query: &'q ElementQuery) -> Result<Self, ActionError> {
        Ok(match query {
            ElementQuery::Css { selector } => Matcher::Css(CssSelector::parse(selector)?),
            ElementQuery::XPath { expression } => Matcher::XPath(XPathSelector::parse(expression)?),
            other => Matcher::Query(other),
        })
    }

    fn matches(&self, el: &ScriptedElement, all: &[ScriptedElement]) -> bool {
        match self {
            Matcher::Css(css) => css.matches(el),
            Matcher::XPath(xpath) => xpath.matches(el),
            Matcher::Query(query) => match query {
                ElementQuery::Id { id } => el.attr("id") == Some(id.as_str()),
                ElementQuery::Attribute { name, value } => el.attr(name) == Some(value.as_str()),
                ElementQuery::Text { value, exact, tag } => {
                    if let Some(tag) = tag {
                        if !tag.eq_ignore_ascii_case(&el.tag()) {
                            return false;
                        }
                    }
                    let text = el.normalized_text();
                    if text.is_empty() {
                        return false;
                    }
                    if *exact {
                        text == normalize_ws(value)
                    } else {
                        contains_ci(&text, value)
                    }
                }
                ElementQuery::Role { role, name } => {
                    el.snapshot.inferred_role().as_deref() == Some(role.as_str())
                        && contains_ci(&el.accessible_name(), name)
                }
                ElementQuery::Label { label } => {
                    if let Some(aria) = el.snapshot.non_empty_attribute("aria-label") {
                        if contains_ci(aria, label) {
                            return true;
                        }
                    }
                    let Some(id) = el.snapshot.non_empty_attribute("id") else {
                        return false;
                    };
                    all.iter().any(|candidate| {
                        candidate.tag() == "label"
                            && candidate.attr("for") == Some(id)
                            && contains_ci(&candidate.snapshot.text, label)
                    })
                }
                ElementQuery::Placeholder { value } => el
                    .attr("placeholder")
                    .map(|v| contains_ci(v, value))
                    .unwrap_or(false),
                ElementQuery::Title { value } => el
                    .attr("title")
                    .map(|v| contains_ci(v, value))
                    .unwrap_or(false),
                ElementQuery::AltText { value } => el
                    .attr("alt")
                    .map(|v| contains_ci(v, value))
                    .unwrap_or(false),
                ElementQuery::TestId { value } => el.attr("data-testid") == Some(value.as_str()),
                ElementQuery::Css { .. } | ElementQuery::XPath { .. } => false,
            },
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.trim().chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        let wanted: Vec<char> = expected.chars().collect();
        let end = self.pos + wanted.len();
        if end <= self.chars.len() && self.chars[self.pos..end] == wanted[..] {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().map(char::is_whitespace).unwrap_or(false) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn unsupported(kind: &str, input: &str) -> ActionError {
    ActionError::Script(format!("unsupported {} selector: {}", kind, input))
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// `tag#id[attr="value"]...`
struct CssSelector {
    tag: Option<String>,
    id: Option<String>,
    attributes: Vec<(String, String)>,
}

impl CssSelector {
    fn parse(input: &str) -> Result<Self, ActionError> {
        let mut cursor = Cursor::new(input);
        let tag = cursor.take_while(|c| is_ident(c) || c == '*');
        let tag = (!tag.is_empty() && tag != "*").then(|| tag.to_lowercase());

        let mut id = None;
        if cursor.eat('#') {
            let mut value = String::new();
            while let Some(c) = cursor.peek() {
                if c == '\\' {
                    cursor.bump();
                    match cursor.bump() {
                        Some(escaped) => value.push(escaped),
                        None => return Err(unsupported("CSS", input)),
                    }
                } else if is_ident(c) {
                    value.push(c);
                    cursor.bump();
                } else {
                    break;
                }
            }
            if value.is_empty() {
                return Err(unsupported("CSS", input));
            }
            id = Some(value);
        }

        let mut attributes = Vec::new();
        while cursor.eat('[') {
            let name = cursor.take_while(|c| is_ident(c) || c == ':');
            if name.is_empty() || !cursor.eat('=') || !cursor.eat('"') {
                return Err(unsupported("CSS", input));
            }
            let mut value = String::new();
            loop {
                match cursor.bump() {
                    Some('\\') => match cursor.bump() {
                        Some(escaped) => value.push(escaped),
                        None => return Err(unsupported("CSS", input)),
                    },
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => return Err(unsupported("CSS", input)),
                }
            }
            if !cursor.eat(']') {
                return Err(unsupported("CSS", input));
            }
            attributes.push((name, value));
        }

        if !cursor.at_end() || (tag.is_none() && id.is_none() && attributes.is_empty()) {
            return Err(unsupported("CSS", input));
        }
        Ok(Self {
            tag,
            id,
            attributes,
        })
    }

    fn matches(&self, el: &ScriptedElement) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != el.tag() {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|(name, value)| el.attr(name) == Some(value.as_str()))
    }
}

enum XPathCondition {
    Attribute(String, String),
    TextContains(String),
}

/// `//tag[@attr=literal]` or `//tag[contains(text(), literal)]`
struct XPathSelector {
    tag: Option<String>,
    condition: XPathCondition,
}

impl XPathSelector {
    fn parse(input: &str) -> Result<Self, ActionError> {
        let err = || unsupported("XPath", input);
        let mut cursor = Cursor::new(input);
        if !cursor.eat_str("//") {
            return Err(err());
        }
        let tag = cursor.take_while(|c| is_ident(c) || c == '*');
        if tag.is_empty() {
            return Err(err());
        }
        let tag = (tag != "*").then(|| tag.to_lowercase());
        if !cursor.eat('[') {
            return Err(err());
        }
        cursor.skip_ws();
        let condition = if cursor.eat('@') {
            let name = cursor.take_while(|c| is_ident(c) || c == ':');
            cursor.skip_ws();
            if name.is_empty() || !cursor.eat('=') {
                return Err(err());
            }
            cursor.skip_ws();
            let value = parse_xpath_literal(&mut cursor).ok_or_else(err)?;
            XPathCondition::Attribute(name, value)
        } else if cursor.eat_str("contains(") {
            cursor.skip_ws();
            if !cursor.eat_str("text()") {
                return Err(err());
            }
            cursor.skip_ws();
            if !cursor.eat(',') {
                return Err(err());
            }
            cursor.skip_ws();
            let value = parse_xpath_literal(&mut cursor).ok_or_else(err)?;
            cursor.skip_ws();
            if !cursor.eat(')') {
                return Err(err());
            }
            XPathCondition::TextContains(value)
        } else {
            return Err(err());
        };
        cursor.skip_ws();
        if !cursor.eat(']') || !cursor.at_end() {
            return Err(err());
        }
        Ok(Self { tag, condition })
    }

    fn matches(&self, el: &ScriptedElement) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != el.tag() {
                return false;
            }
        }
        match &self.condition {
            XPathCondition::Attribute(name, value) => el.attr(name) == Some(value.as_str()),
            XPathCondition::TextContains(value) => el.snapshot.text.contains(value.as_str()),
        }
    }
}

fn parse_xpath_literal(cursor: &mut Cursor) -> Option<String> {
    match cursor.peek()? {
        quote @ ('\'' | '"') => {
            cursor.bump();
            let mut value = String::new();
            loop {
                let c = cursor.bump()?;
                if c == quote {
                    return Some(value);
                }
                value.push(c);
            }
        }
        _ => {
            if !cursor.eat_str("concat(") {
                return None;
            }
            let mut value = String::new();
            loop {
                cursor.skip_ws();
                value.push_str(&parse_xpath_literal(cursor)?);
                cursor.skip_ws();
                if cursor.eat(')') {
                    return Some(value);
                }
                if !cursor.eat(',') {
                    return None;
                }
            }
        }
    }
}
