//! URLクエリ（`?search=...&page=...`）の読み書き

use patient_records_common::RouteQuery;
use web_sys::UrlSearchParams;

pub fn read_route() -> RouteQuery {
    let Some(search) = web_sys::window().and_then(|w| w.location().search().ok()) else {
        return RouteQuery::default();
    };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return RouteQuery::default();
    };
    RouteQuery {
        search: params.get("search"),
        page: params.get("page"),
    }
}

/// ページ番号（1始まり、無ければ1）
pub fn route_page(route: &RouteQuery) -> u32 {
    route
        .page
        .as_deref()
        .and_then(|p| p.parse().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// 今のクエリに `search`/`page` を上書きする（他のパラメータは残す）
fn merged_query(current: &str, route: &RouteQuery) -> Option<String> {
    let params = UrlSearchParams::new_with_str(current).ok()?;
    if let Some(search) = &route.search {
        params.set("search", search);
    }
    if let Some(page) = &route.page {
        params.set("page", page);
    }
    Some(String::from(params.to_string()))
}

/// クエリを書き換えて再読み込みする
pub fn navigate(route: &RouteQuery) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let current = location.search().unwrap_or_default();
    let Some(query) = merged_query(&current, route) else {
        return;
    };
    if let Err(e) = location.set_search(&query) {
        gloo::console::error!(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(page: Option<&str>) -> RouteQuery {
        RouteQuery {
            search: None,
            page: page.map(String::from),
        }
    }

    #[test]
    fn test_route_page_defaults_to_first() {
        assert_eq!(route_page(&route(None)), 1);
        assert_eq!(route_page(&route(Some("0"))), 1);
        assert_eq!(route_page(&route(Some("abc"))), 1);
        assert_eq!(route_page(&route(Some("3"))), 3);
    }
}
