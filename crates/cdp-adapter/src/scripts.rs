//! Page scripts evaluated through `Runtime.evaluate`
//!
//! Element queries run in the page, stamp the first match with a unique
//! anchor attribute and hand back a CSS selector for that anchor. Every
//! dynamic value is embedded as a JSON literal.

use action_primitives::ElementQuery;
use serde::Deserialize;
use serde_json::Value;
use waymark_core_types::ElementSnapshot;

pub const ANCHOR_ATTR: &str = "data-waymark-anchor";

fn lit(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Selector for an anchor token.
pub fn anchor_selector(token: &str) -> String {
    format!("[{}=\"{}\"]", ANCHOR_ATTR, token)
}

const PRELUDE: &str = r#"
    const normalize = (input) => (input || '').replace(/\s+/g, ' ').trim();
    const lower = (input) => normalize(input).toLowerCase();
    const containsCi = (haystack, needle) => lower(haystack).includes(lower(needle));
    const textOf = (el) => normalize(el.innerText || el.textContent || '');
    const implicitRole = (el) => {
        const tag = el.tagName.toLowerCase();
        const type = (el.getAttribute('type') || '').toLowerCase();
        if (tag === 'input') {
            if (type === 'checkbox' || type === 'radio') return type;
            if (type === 'submit') return 'button';
            return 'textbox';
        }
        const roles = { button: 'button', a: 'link', textarea: 'textbox', select: 'combobox',
            h1: 'heading', h2: 'heading', h3: 'heading', h4: 'heading', h5: 'heading', h6: 'heading',
            img: 'img', table: 'table', ul: 'list', ol: 'list', nav: 'navigation' };
        return roles[tag] || '';
    };
    const roleOf = (el) => (el.getAttribute('role') || '').trim().toLowerCase() || implicitRole(el);
    const nameOf = (el) => {
        const label = el.getAttribute('aria-label');
        if (label && label.trim()) return normalize(label);
        return textOf(el);
    };
    const innermost = (hits) => hits.find(el => !hits.some(other => other !== el && el.contains(other))) || null;
    const byAttr = (name, test) => Array.from(document.querySelectorAll('[' + name + ']'))
        .find(el => test(el.getAttribute(name) || '')) || null;
"#;

fn finder(query: &ElementQuery) -> String {
    match query {
        ElementQuery::Id { id } => format!("return document.getElementById({});", lit(id)),
        ElementQuery::Css { selector } => {
            format!("return document.querySelector({});", lit(selector))
        }
        ElementQuery::XPath { expression } => format!(
            "return document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;",
            lit(expression)
        ),
        ElementQuery::Attribute { name, value } => format!(
            "const value = {}; return Array.from(document.querySelectorAll('*')).find(el => el.getAttribute({}) === value) || null;",
            lit(value),
            lit(name)
        ),
        ElementQuery::Text { value, exact, tag } => format!(
            r#"const target = {value};
            const exact = {exact};
            const scope = {scope};
            const test = (el) => {{
                const text = textOf(el);
                if (!text) return false;
                return exact ? text === normalize(target) : containsCi(text, target);
            }};
            return innermost(Array.from(document.querySelectorAll(scope)).filter(test));"#,
            value = lit(value),
            exact = exact,
            scope = lit(tag.as_deref().unwrap_or("body *")),
        ),
        ElementQuery::Role { role, name } => format!(
            r#"const role = {role};
            const name = {name};
            return innermost(Array.from(document.querySelectorAll('body *'))
                .filter(el => roleOf(el) === role && containsCi(nameOf(el), name)));"#,
            role = lit(&role.to_lowercase()),
            name = lit(name),
        ),
        ElementQuery::Label { label } => format!(
            r#"const label = {label};
            const aria = byAttr('aria-label', value => value.trim() && containsCi(value, label));
            if (aria) return aria;
            const owner = Array.from(document.querySelectorAll('label'))
                .find(el => containsCi(textOf(el), label) && el.control);
            return owner ? owner.control : null;"#,
            label = lit(label),
        ),
        ElementQuery::Placeholder { value } => contains_attr("placeholder", value),
        ElementQuery::Title { value } => contains_attr("title", value),
        ElementQuery::AltText { value } => contains_attr("alt", value),
        ElementQuery::TestId { value } => format!(
            "const value = {}; return byAttr('data-testid', v => v === value);",
            lit(value)
        ),
    }
}

fn contains_attr(attr: &str, value: &str) -> String {
    format!(
        "const value = {}; return byAttr({}, v => containsCi(v, value));",
        lit(value),
        lit(attr)
    )
}

/// Script that anchors the first element matching `query` with `token`.
pub fn query_script(query: &ElementQuery, token: &str) -> String {
    format!(
        r#"(() => {{
    {prelude}
    const match = (() => {{ {finder} }})();
    if (!match) {{
        return {{ status: 'not-found' }};
    }}
    match.setAttribute({attr}, {token});
    return {{ status: 'ok', selector: {selector} }};
}})()"#,
        prelude = PRELUDE,
        finder = finder(query),
        attr = lit(ANCHOR_ATTR),
        token = lit(token),
        selector = lit(&anchor_selector(token)),
    )
}

/// Anchors whatever currently has focus, falling back to the body.
pub fn focused_script(token: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.activeElement || document.body;
    if (!el) {{
        return {{ status: 'not-found' }};
    }}
    el.setAttribute({attr}, {token});
    return {{ status: 'ok', selector: {selector} }};
}})()"#,
        attr = lit(ANCHOR_ATTR),
        token = lit(token),
        selector = lit(&anchor_selector(token)),
    )
}

pub fn visibility_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) {{ return {{ status: 'missing', visible: false }}; }}
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const visible = style.visibility !== 'hidden' && style.display !== 'none' && (rect.width > 0 || rect.height > 0 || el.getClientRects().length > 0);
    return {{ status: 'ok', visible }};
}})()"#,
        selector = lit(selector),
    )
}

/// Clears an input, textarea or contenteditable element.
pub fn clear_script(selector: &str) -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) {{ return {{ status: 'missing' }}; }}
    if (el.disabled || el.readOnly) {{ return {{ status: 'readonly' }}; }}
    el.focus();
    if ('value' in el) {{
        el.value = '';
    }} else if (el.isContentEditable) {{
        el.textContent = '';
    }} else {{
        return {{ status: 'not-editable' }};
    }}
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return {{ status: 'ok' }};
}})()"#,
        selector = lit(selector),
    )
}

/// Selects the option whose trimmed label equals `label`.
pub fn select_script(selector: &str, label: &str) -> String {
    format!(
        r#"(() => {{
    const root = document.querySelector({selector});
    if (!root) {{ return {{ status: 'missing' }}; }}
    if (!root.options) {{ return {{ status: 'not-select' }}; }}
    const target = {label}.trim();
    const option = Array.from(root.options).find(opt => (opt.text || '').trim() === target);
    if (!option) {{ return {{ status: 'not-found' }}; }}
    root.value = option.value;
    option.selected = true;
    root.dispatchEvent(new Event('input', {{ bubbles: true }}));
    root.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return {{ status: 'ok' }};
}})()"#,
        selector = lit(selector),
        label = lit(label),
    )
}

/// Reads the element under a viewport point; `element` has the
/// `ElementSnapshot` shape or is null.
pub fn element_at_script(x: i32, y: i32) -> String {
    format!(
        r#"(() => {{
    const el = document.elementFromPoint({x}, {y});
    if (!el) {{ return {{ element: null }}; }}
    const rect = el.getBoundingClientRect();
    return {{ element: {{
        tag: el.tagName.toLowerCase(),
        text: (el.innerText || el.textContent || '').trim(),
        attributes: Array.from(el.attributes)
            .filter(attr => attr.name !== {attr})
            .map(attr => [attr.name, attr.value]),
        bounding_box: {{ x: rect.x, y: rect.y, width: rect.width, height: rect.height }},
    }} }};
}})()"#,
        x = x,
        y = y,
        attr = lit(ANCHOR_ATTR),
    )
}

pub const VIEWPORT: &str = "({ width: window.innerWidth, height: window.innerHeight })";
pub const BODY_TEXT: &str = "document.body ? document.body.innerText : ''";

pub fn scroll_script(dx: i32, dy: i32) -> String {
    format!("window.scrollBy({}, {})", dx, dy)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementAt {
    pub element: Option<ElementSnapshot>,
}

/// `{status: ...}` object returned by the scripts above.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStatus {
    pub status: String,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
}

impl ScriptStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
