//! Inline client scripts stamped into generated pages. The decisions they
//! make in the browser mirror `filter`, `nav` and `prefs`; numbers such as
//! the debounce window and the spy band are injected from Rust.

use crate::dom::Node;
use crate::nav::SpyBand;
use crate::prefs::{Theme, THEME_KEY};

/// Category changes apply at once, search waits for `{{DEBOUNCE_MS}}` ms
/// of quiet. Cards carry their own tags and search text.
const FILTER_JS: &str = r#"
(function(){
    var grid = document.getElementById('projects-grid');
    var select = document.getElementById('category-filter');
    var search = document.getElementById('search-filter');
    var count = document.getElementById('results-count');
    if (!grid) return;
    var cards = Array.prototype.slice.call(grid.querySelectorAll('.card'));
    var empty = document.getElementById('no-results-template');
    var state = { category: select ? select.value : '', term: search ? search.value.trim().toLowerCase() : '' };
    var timer = null;

    function apply() {
        var shown = 0;
        cards.forEach(function(card) {
            var tags = (card.getAttribute('data-tags') || '').split('|');
            var text = card.getAttribute('data-search') || '';
            var ok = (!state.category || tags.indexOf(state.category) !== -1) &&
                     (!state.term || text.indexOf(state.term) !== -1);
            card.hidden = !ok;
            if (ok) shown++;
        });
        if (empty) empty.hidden = shown !== 0;
        if (count) count.textContent = 'Showing ' + shown + ' of ' + cards.length + ' projects';
    }

    if (select) select.addEventListener('change', function() {
        state.category = select.value;
        apply();
    });
    if (search) search.addEventListener('input', function() {
        clearTimeout(timer);
        timer = setTimeout(function() {
            state.term = search.value.trim().toLowerCase();
            apply();
        }, {{DEBOUNCE_MS}});
    });
    document.addEventListener('click', function(e) {
        var target = e.target.closest('[data-action="{{CLEAR_ACTION}}"]');
        if (!target) return;
        clearTimeout(timer);
        state.category = '';
        state.term = '';
        if (select) select.value = '';
        if (search) search.value = '';
        apply();
    });
})();
"#;

const SCROLL_SPY_JS: &str = r#"
(function(){
    var links = document.querySelectorAll('#toc-list .toc__link');
    if (!links.length || !('IntersectionObserver' in window)) return;
    var obs = new IntersectionObserver(function(entries) {
        var active = null;
        entries.forEach(function(entry) {
            if (entry.isIntersecting) active = entry.target.id;
        });
        if (!active) return;
        links.forEach(function(link) {
            link.classList.toggle('toc__link--active', link.getAttribute('href') === '#' + active);
        });
    }, { rootMargin: '{{ROOT_MARGIN}}' });
    document.querySelectorAll('.project-section').forEach(function(s) { obs.observe(s); });
})();
"#;

const THEME_JS: &str = r#"
(function(){
    var root = document.documentElement;
    var stored = null;
    try { stored = JSON.parse(localStorage.getItem('{{THEME_KEY}}')); } catch (e) {}
    var theme = stored === 'dark' || stored === 'light' ? stored : '{{DEFAULT_THEME}}';
    root.setAttribute('data-theme', theme);
    var button = document.getElementById('theme-toggle');
    if (!button) return;
    function label() {
        var next = theme === 'dark' ? 'Light' : 'Dark';
        var span = button.querySelector('.theme-toggle__label');
        if (span) span.textContent = next + ' mode';
        button.setAttribute('aria-pressed', theme === 'dark' ? 'true' : 'false');
    }
    label();
    button.addEventListener('click', function() {
        theme = theme === 'dark' ? 'light' : 'dark';
        root.setAttribute('data-theme', theme);
        try { localStorage.setItem('{{THEME_KEY}}', JSON.stringify(theme)); } catch (e) {}
        label();
    });
})();
"#;

/// Arrow keys cycle through the cards left visible by the filter,
/// wrapping at both ends; Home/End jump to the first and last.
const CAROUSEL_JS: &str = r#"
(function(){
    var grid = document.getElementById('projects-grid');
    if (!grid) return;
    grid.addEventListener('keydown', function(e) {
        var card = e.target.closest('.card');
        if (!card) return;
        var visible = Array.prototype.filter.call(grid.querySelectorAll('.card'), function(c) { return !c.hidden; });
        var n = visible.length;
        var i = visible.indexOf(card);
        if (!n || i === -1) return;
        var target = null;
        if (e.key === 'ArrowRight' || e.key === 'ArrowDown') {
            target = n > 1 ? visible[(i + 1) % n] : null;
        } else if (e.key === 'ArrowLeft' || e.key === 'ArrowUp') {
            target = n > 1 ? visible[(i - 1 + n) % n] : null;
        } else if (e.key === 'Home') {
            target = visible[0];
        } else if (e.key === 'End') {
            target = visible[n - 1];
        }
        if (target) {
            e.preventDefault();
            target.focus();
        }
    });
})();
"#;

/// Retry control of the load-error panel.
const RETRY_JS: &str = r#"
(function(){
    document.addEventListener('click', function(e) {
        if (e.target.closest('[data-action="{{RETRY_ACTION}}"]')) location.reload();
    });
})();
"#;

fn script(body: String) -> Node {
    Node::Raw(format!("<script>{}</script>", body))
}

pub fn filter_script(debounce_ms: u64) -> Node {
    script(
        FILTER_JS
            .replace("{{DEBOUNCE_MS}}", &debounce_ms.to_string())
            .replace("{{CLEAR_ACTION}}", super::states::CLEAR_FILTERS_ACTION),
    )
}

pub fn scroll_spy_script(band: &SpyBand) -> Node {
    script(SCROLL_SPY_JS.replace("{{ROOT_MARGIN}}", &band.root_margin()))
}

/// Runs early in `<head>` so the stored theme applies before first paint.
pub fn theme_script(default_theme: Theme) -> Node {
    script(
        THEME_JS
            .replace("{{THEME_KEY}}", THEME_KEY)
            .replace("{{DEFAULT_THEME}}", default_theme.as_str()),
    )
}

pub fn carousel_script() -> Node {
    script(CAROUSEL_JS.to_string())
}

pub fn retry_script() -> Node {
    script(RETRY_JS.replace("{{RETRY_ACTION}}", super::states::RETRY_ACTION))
}
