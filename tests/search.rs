use vellum::search::{self, Direction, MemoryBuffer, SearchFlags, SearchQuery, SearchTarget};

#[test]
fn test_empty_needle_is_noop() {
    let mut buf = MemoryBuffer::new("hello");
    let outcome = search::find(&mut buf, &SearchQuery::forward("", 0).wrapping());
    assert!(!outcome.found);
    assert!(!outcome.wrapped);
}

#[test]
fn test_forward_find_from_anchor() {
    let mut buf = MemoryBuffer::new("abc xyz abc");
    let outcome = search::find(&mut buf, &SearchQuery::forward("abc", 1));
    assert!(outcome.found);
    assert_eq!(outcome.range, Some((8, 11)));
    assert!(!outcome.wrapped);
    // a successful find selects the match
    assert_eq!(buf.selection(), (8, 11));
}

#[test]
fn test_forward_no_wrap_reports_plain_not_found() {
    let mut buf = MemoryBuffer::new("abc xyz abc");
    let outcome = search::find(&mut buf, &SearchQuery::forward("abc", 9));
    assert!(!outcome.found);
    assert!(!outcome.wrapped);
    assert_eq!(outcome.range, None);
}

#[test]
fn test_forward_wrap_finds_match_before_anchor() {
    let mut buf = MemoryBuffer::new("abc xyz abc");
    let outcome = search::find(&mut buf, &SearchQuery::forward("xyz", 9).wrapping());
    assert!(outcome.found);
    assert!(outcome.wrapped);
    assert_eq!(outcome.range, Some((4, 7)));
}

#[test]
fn test_forward_match_straddling_anchor_missed_by_both_windows() {
    let mut buf = MemoryBuffer::new("abcdef");
    // "cd" straddles anchor 3: neither [3, len) nor [0, 3) contains it
    let outcome = search::find(&mut buf, &SearchQuery::forward("cd", 3).wrapping());
    assert!(!outcome.found);
}

#[test]
fn test_backward_find_nearest_before_anchor() {
    let mut buf = MemoryBuffer::new("abc xyz abc xyz");
    let outcome = search::find(&mut buf, &SearchQuery::backward("abc", 12));
    assert!(outcome.found);
    assert_eq!(outcome.range, Some((8, 11)));
}

#[test]
fn test_backward_excludes_match_at_anchor() {
    let mut buf = MemoryBuffer::new("xyz abc");
    // the only match starts exactly at the anchor: the primary window
    // must not see it
    let outcome = search::find(&mut buf, &SearchQuery::backward("abc", 4));
    assert!(!outcome.found);
}

#[test]
fn test_backward_boundary_candidate_ends_at_anchor_minus_one() {
    let mut buf = MemoryBuffer::new("ab ab");
    // the primary window ends at anchor-1: a match ending exactly there
    // is found
    let outcome = search::find(&mut buf, &SearchQuery::backward("ab", 3));
    assert!(outcome.found);
    assert_eq!(outcome.range, Some((0, 2)));
}

#[test]
fn test_backward_skips_match_ending_at_anchor() {
    let mut buf = MemoryBuffer::new("xab");
    // a match ending exactly at the anchor sits outside [0, anchor-1]: a
    // just-found selection under the caret is never re-matched
    let outcome = search::find(&mut buf, &SearchQuery::backward("ab", 3));
    assert!(!outcome.found);
}

#[test]
fn test_backward_wrap_searches_tail() {
    let mut buf = MemoryBuffer::new("xyz abc");
    let outcome = search::find(&mut buf, &SearchQuery::backward("abc", 4).wrapping());
    assert!(outcome.found);
    assert!(outcome.wrapped);
    assert_eq!(outcome.range, Some((4, 7)));
}

#[test]
fn test_backward_from_zero_only_wrap_can_match() {
    let mut buf = MemoryBuffer::new("abc");
    let plain = search::find(&mut buf, &SearchQuery::backward("abc", 0));
    assert!(!plain.found);

    let wrapped = search::find(&mut buf, &SearchQuery::backward("abc", 0).wrapping());
    assert!(wrapped.found);
    assert!(wrapped.wrapped);
}

#[test]
fn test_find_match_case_flag() {
    let mut buf = MemoryBuffer::new("Foo foo");
    let mut query = SearchQuery::forward("FOO", 0);

    query.flags.match_case = true;
    assert!(!search::find(&mut buf, &query).found);

    query.flags.match_case = false;
    let outcome = search::find(&mut buf, &query);
    assert_eq!(outcome.range, Some((0, 3)));
}

#[test]
fn test_find_whole_word_flag() {
    let mut buf = MemoryBuffer::new("scat cat");
    let mut query = SearchQuery::forward("cat", 0);
    query.flags.whole_word = true;
    let outcome = search::find(&mut buf, &query);
    assert_eq!(outcome.range, Some((5, 8)));
}

#[test]
fn test_find_regex_flag() {
    let mut buf = MemoryBuffer::new("version 1.4.92");
    let mut query = SearchQuery::forward(r"\d+\.\d+\.\d+", 0);
    query.flags.regex = true;
    let outcome = search::find(&mut buf, &query);
    assert_eq!(outcome.range, Some((8, 14)));
}

#[test]
fn test_anchor_past_end_is_clamped() {
    let mut buf = MemoryBuffer::new("abc");
    let outcome = search::find(&mut buf, &SearchQuery::forward("abc", 999).wrapping());
    assert!(outcome.found);
    assert!(outcome.wrapped);
}

// ---------------------------------------------------------------------
// replace (interactive single)
// ---------------------------------------------------------------------

#[test]
fn test_replace_requires_live_selection() {
    let mut buf = MemoryBuffer::new("abc abc");
    buf.set_caret(0);
    // empty selection: nothing substituted, but the find still chains
    let outcome = search::replace(&mut buf, &SearchQuery::forward("abc", 0), "zzz");
    assert_eq!(buf.text(), "abc abc");
    assert!(outcome.found);
    assert_eq!(outcome.range, Some((0, 3)));
}

#[test]
fn test_replace_substitutes_selection_then_finds_next() {
    let mut buf = MemoryBuffer::new("abc abc abc");
    // select the first match as a prior find would
    buf.set_selection(0, 3);
    let outcome = search::replace(&mut buf, &SearchQuery::forward("abc", 0), "xy");
    assert_eq!(buf.text(), "xy abc abc");
    assert!(outcome.found);
    // the chained find selected the next occurrence
    assert_eq!(outcome.range, Some((3, 6)));
    assert_eq!(buf.selection(), (3, 6));
}

#[test]
fn test_replace_forward_resumes_after_inserted_text() {
    let mut buf = MemoryBuffer::new("aa");
    buf.set_selection(0, 2);
    // replacement re-contains the needle; the chained forward find must
    // start past the inserted text, not inside it
    let outcome = search::replace(&mut buf, &SearchQuery::forward("aa", 0), "aaa");
    assert_eq!(buf.text(), "aaa");
    assert!(!outcome.found);
}

#[test]
fn test_replace_chain_converges() {
    let mut buf = MemoryBuffer::new("a b a b a");
    let query = SearchQuery::forward("a", 0).wrapping();

    // prime the cycle
    let first = search::find(&mut buf, &query);
    assert!(first.found);

    let mut replaced = 0;
    let mut query = query;
    for _ in 0..10 {
        let outcome = search::replace(&mut buf, &query, "c");
        replaced += 1;
        match outcome.range {
            Some((start, _)) => query.anchor = start,
            None => break,
        }
    }
    assert_eq!(buf.text(), "c b c b c");
    assert_eq!(replaced, 3);
}

#[test]
fn test_replace_regex_expands_groups() {
    let mut buf = MemoryBuffer::new("name: alpha");
    let mut query = SearchQuery::forward(r"name: (\w+)", 0);
    query.flags.regex = true;

    let found = search::find(&mut buf, &query);
    assert_eq!(found.range, Some((0, 11)));

    search::replace(&mut buf, &query, "id = $1");
    assert_eq!(buf.text(), "id = alpha");
}

// ---------------------------------------------------------------------
// replace_all
// ---------------------------------------------------------------------

#[test]
fn test_replace_all_single_pass() {
    let mut buf = MemoryBuffer::new("aaa");
    let count = search::replace_all(&mut buf, "a", "b", SearchFlags::default());
    assert_eq!(count, 3);
    assert_eq!(buf.text(), "bbb");
}

#[test]
fn test_replace_all_growing_replacement_terminates() {
    let mut buf = MemoryBuffer::new("aaa");
    // "a" -> "aa" would loop forever if the scan resumed at the match
    // start; resuming after the inserted text terminates in one pass
    let count = search::replace_all(&mut buf, "a", "aa", SearchFlags::default());
    assert_eq!(count, 3);
    assert_eq!(buf.text(), "aaaaaa");
}

#[test]
fn test_replace_all_ignores_caret_position() {
    let mut buf = MemoryBuffer::new("x x x");
    buf.set_caret(4);
    // anchor is forced to 0: matches before the caret are replaced too
    let count = search::replace_all(&mut buf, "x", "y", SearchFlags::default());
    assert_eq!(count, 3);
    assert_eq!(buf.text(), "y y y");
}

#[test]
fn test_replace_all_empty_needle_does_nothing() {
    let mut buf = MemoryBuffer::new("abc");
    assert_eq!(search::replace_all(&mut buf, "", "x", SearchFlags::default()), 0);
    assert_eq!(buf.text(), "abc");
}

#[test]
fn test_replace_all_no_match() {
    let mut buf = MemoryBuffer::new("abc");
    assert_eq!(
        search::replace_all(&mut buf, "zzz", "x", SearchFlags::default()),
        0
    );
}

#[test]
fn test_replace_all_with_shrinking_replacement() {
    let mut buf = MemoryBuffer::new("one, two, three");
    let count = search::replace_all(&mut buf, ", ", ";", SearchFlags::default());
    assert_eq!(count, 2);
    assert_eq!(buf.text(), "one;two;three");
}

#[test]
fn test_replace_all_regex_back_references() {
    let mut buf = MemoryBuffer::new("a=1 b=2 c=3");
    let flags = SearchFlags {
        regex: true,
        ..Default::default()
    };
    let count = search::replace_all(&mut buf, r"(\w)=(\d)", "$2:$1", flags);
    assert_eq!(count, 3);
    assert_eq!(buf.text(), "1:a 2:b 3:c");
}

#[test]
fn test_replace_all_whole_word() {
    let mut buf = MemoryBuffer::new("cat concatenate cat");
    let flags = SearchFlags {
        whole_word: true,
        ..Default::default()
    };
    let count = search::replace_all(&mut buf, "cat", "dog", flags);
    assert_eq!(count, 2);
    assert_eq!(buf.text(), "dog concatenate dog");
}

#[test]
fn test_direction_default_is_forward() {
    assert_eq!(Direction::default(), Direction::Forward);
}
