use radixmux::Tree;

fn fixture() -> (Tree<String>, Vec<String>) {
    let long_path = format!("/l{}ng", "o".repeat(128));

    let mut routes: Vec<String> = [
        "/hi",
        "/b/",
        "/ABC/",
        "/search/{query}",
        "/cmd/{tool}/",
        "/src/{filepath:*}",
        "/proc/{id}/status",
        "/regex/{id:.*}_test/data",
        "/x",
        "/x/y",
        "/y/",
        "/y/z",
        "/0/{id}",
        "/0/{id}/1",
        "/1/{id}/",
        "/1/{id}/2",
        "/aa",
        "/a/",
        "/doc",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/doc/go/away",
        "/no/a",
        "/no/b",
        "/Π",
        "/u/apfêl/",
        "/u/äpfêl/",
        "/u/äpkul/",
        "/u/öpfêl",
        "/v/Äpfêl/",
        "/v/Öpfêl",
        "/w/♬",  // 3-byte code point
        "/w/♭/", // 3-byte code point, last byte differs
        "/w/𠜎",  // 4-byte code point
        "/w/𠜏/", // 4-byte code point
    ]
    .iter()
    .map(|route| route.to_string())
    .collect();
    routes.push(long_path);

    let mut tree = Tree::new();
    for route in &routes {
        tree.add("GET", route, route.clone())
            .unwrap_or_else(|err| panic!("inserting route '{route}': {err}"));
    }

    (tree, routes)
}

#[test]
fn registered_paths_reconstruct_to_themselves() {
    let (tree, routes) = fixture();
    let mut buf = String::new();

    for fix_trailing_slash in [true, false] {
        for route in &routes {
            let found = tree.find_case_insensitive_path("GET", route, fix_trailing_slash, &mut buf);

            assert!(found, "route '{route}' not found (fix = {fix_trailing_slash})");
            assert_eq!(&buf, route, "wrong result for route '{route}'");
            buf.clear();
        }
    }
}

#[test]
fn mis_cased_paths_reconstruct_the_canonical_spelling() {
    let (tree, routes) = fixture();
    let long_path = routes.last().unwrap().clone();
    let mis_cased_long = format!("/l{}ng/", "O".repeat(128));

    // (input, canonical output, found, needs a trailing-slash fix)
    let cases: Vec<(&str, &str, bool, bool)> = vec![
        ("/HI", "/hi", true, false),
        ("/HI/", "/hi", true, true),
        ("/B", "/b/", true, true),
        ("/B/", "/b/", true, false),
        ("/abc", "/ABC/", true, true),
        ("/abc/", "/ABC/", true, false),
        ("/aBc", "/ABC/", true, true),
        ("/aBc/", "/ABC/", true, false),
        ("/abC", "/ABC/", true, true),
        ("/abC/", "/ABC/", true, false),
        ("/SEARCH/QUERY", "/search/QUERY", true, false),
        ("/SEARCH/QUERY/", "/search/QUERY", true, true),
        ("/CMD/TOOL/", "/cmd/TOOL/", true, false),
        ("/CMD/TOOL", "/cmd/TOOL/", true, true),
        ("/SRC/FILE/PATH", "/src/FILE/PATH", true, false),
        ("/ProC/112", "", false, false),
        ("/RegEx/a1b2_test/DaTA", "/regex/a1b2_test/data", true, false),
        ("/RegEx/A1B2_test/DaTA/", "/regex/A1B2_test/data", true, true),
        ("/RegEx/blabla/DaTA/", "", false, false),
        ("/RegEx/blabla_test/fail", "", false, false),
        ("/x/Y", "/x/y", true, false),
        ("/x/Y/", "/x/y", true, true),
        ("/X/y", "/x/y", true, false),
        ("/X/y/", "/x/y", true, true),
        ("/X/Y", "/x/y", true, false),
        ("/X/Y/", "/x/y", true, true),
        ("/Y/", "/y/", true, false),
        ("/Y", "/y/", true, true),
        ("/Y/z", "/y/z", true, false),
        ("/Y/z/", "/y/z", true, true),
        ("/Y/Z", "/y/z", true, false),
        ("/Y/Z/", "/y/z", true, true),
        ("/y/Z", "/y/z", true, false),
        ("/y/Z/", "/y/z", true, true),
        ("/Aa", "/aa", true, false),
        ("/Aa/", "/aa", true, true),
        ("/AA", "/aa", true, false),
        ("/AA/", "/aa", true, true),
        ("/aA", "/aa", true, false),
        ("/aA/", "/aa", true, true),
        ("/A/", "/a/", true, false),
        ("/A", "/a/", true, true),
        ("/DOC", "/doc", true, false),
        ("/DOC/", "/doc", true, true),
        ("/NO", "", false, true),
        ("/DOC/GO", "", false, true),
        ("/π", "/Π", true, false),
        ("/π/", "/Π", true, true),
        ("/u/ÄPFÊL/", "/u/äpfêl/", true, false),
        ("/U/ÄPKUL/", "/u/äpkul/", true, false),
        ("/u/ÄPFÊL", "/u/äpfêl/", true, true),
        ("/u/ÖPFÊL/", "/u/öpfêl", true, true),
        ("/u/ÖPFÊL", "/u/öpfêl", true, false),
        ("/v/äpfêL/", "/v/Äpfêl/", true, false),
        ("/v/äpfêL", "/v/Äpfêl/", true, true),
        ("/v/öpfêL/", "/v/Öpfêl", true, true),
        ("/v/öpfêL", "/v/Öpfêl", true, false),
        ("/w/♬/", "/w/♬", true, true),
        ("/w/♭", "/w/♭/", true, true),
        ("/w/𠜎/", "/w/𠜎", true, true),
        ("/w/𠜏", "/w/𠜏/", true, true),
        (mis_cased_long.as_str(), long_path.as_str(), true, true),
    ];

    let mut buf = String::new();

    for (input, output, want_found, _) in &cases {
        let found = tree.find_case_insensitive_path("GET", input, true, &mut buf);

        assert_eq!(found, *want_found, "found for '{input}' with fix");
        if *want_found {
            assert_eq!(&buf, output, "output for '{input}' with fix");
        } else {
            assert!(buf.is_empty(), "buffer not rewound for '{input}'");
        }
        buf.clear();
    }

    for (input, output, want_found, needs_slash_fix) in &cases {
        let found = tree.find_case_insensitive_path("GET", input, false, &mut buf);

        if *needs_slash_fix {
            // A path that needs its slash fixed must not be found when the
            // fixup is disabled.
            assert!(!found, "'{input}' found without fix: {buf}");
            assert!(buf.is_empty(), "buffer not rewound for '{input}'");
        } else {
            assert_eq!(found, *want_found, "found for '{input}' without fix");
            if *want_found {
                assert_eq!(&buf, output, "output for '{input}' without fix");
            }
        }
        buf.clear();
    }
}

#[test]
fn buffer_contents_before_the_call_are_preserved() {
    let (tree, _) = fixture();

    let mut buf = String::from("https://example.com");
    let found = tree.find_case_insensitive_path("GET", "/HI", true, &mut buf);

    assert!(found);
    assert_eq!(buf, "https://example.com/hi");

    // A miss truncates back to the pre-call length, not to empty.
    let mut buf = String::from("https://example.com");
    let found = tree.find_case_insensitive_path("GET", "/nowhere", true, &mut buf);

    assert!(!found);
    assert_eq!(buf, "https://example.com");
}

#[test]
fn method_records_are_respected() {
    let (tree, _) = fixture();
    let mut buf = String::new();

    assert!(!tree.find_case_insensitive_path("POST", "/HI", true, &mut buf));
    assert!(buf.is_empty());
}
