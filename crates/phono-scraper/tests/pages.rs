use phono_scraper::{
    Category, ExtractError, PageExtractor, PageTemplate, SoundPosition, Url,
};

fn base() -> Url {
    Url::parse("https://pronuncian.com/sounds").unwrap()
}

fn extractor() -> PageExtractor {
    PageExtractor::new(&PageTemplate::default()).unwrap()
}

fn row(symbol: &str, name: &str, slug: &str) -> String {
    format!(
        r#"<p><strong>{symbol}</strong>{name}<a href="/{slug}-pronunciation">P</a><a href="/{slug}-spelling">S</a><a href="/{slug}-practice">R</a></p>"#
    )
}

fn index_page(vowels: &str, r_vowels: &str, consonants: &str) -> String {
    format!(
        r#"<html><body><div class="main-content">
        <div class="sqs-block html-block"><div class="sqs-block-content"><div>
          <h2>Sounds</h2>
          <p>Pick a sound</p>
          <h3>Vowels</h3>
          <div>{vowels}</div>
          <h3>R-controlled vowels</h3>
          <div>{r_vowels}</div>
          <h3>Consonants</h3>
          <div>{consonants}</div>
        </div></div></div>
        </div></body></html>"#
    )
}

#[test]
fn index_rows_per_category() {
    let page = index_page(
        &format!(
            "{}{}",
            row("/eɪ/ ", "as in day", "long-a"),
            row("/i/", " as in see ", "long-e")
        ),
        &row("/ɝ/", "as in bird", "er"),
        &row("/p/", "as in pie", "p"),
    );

    let sections = extractor().index(&page, &base()).unwrap();
    assert_eq!(
        vec![
            Category::Vowel,
            Category::RControlledVowel,
            Category::Consonant
        ],
        sections.iter().map(|s| s.category).collect::<Vec<_>>()
    );
    assert_eq!(2, sections[0].rows.len());

    let day = sections[0].rows[0].as_ref().unwrap();
    assert_eq!("eɪ", day.transcription);
    assert_eq!("as in day", day.name);
    assert_eq!(
        base().join("/long-a-pronunciation").unwrap(),
        day.pronunciation_url
    );
    assert_eq!(base().join("/long-a-spelling").unwrap(), day.spelling_url);
    assert_eq!(base().join("/long-a-practice").unwrap(), day.practice_url);

    let see = sections[0].rows[1].as_ref().unwrap();
    assert_eq!("i", see.transcription);
    assert_eq!("as in see", see.name);

    let pie = sections[2].rows[0].as_ref().unwrap();
    assert_eq!("p", pie.transcription);
}

#[test]
fn broken_row_does_not_affect_siblings() {
    let broken = r#"<p><strong>/ʊ/</strong>as in book<a href="/book-pronunciation">P</a></p>"#;
    let page = index_page(
        &format!("{broken}{}", row("/u/", "as in blue", "blue")),
        "",
        "",
    );

    let sections = extractor().index(&page, &base()).unwrap();
    let rows = &sections[0].rows;
    assert_eq!(2, rows.len());
    assert!(matches!(
        &rows[0],
        Err(ExtractError::StructureMismatch { what: "spelling link", .. })
    ));
    assert_eq!("u", rows[1].as_ref().unwrap().transcription);
    assert!(sections[1].rows.is_empty());
}

#[test]
fn row_without_transcription_is_a_mismatch() {
    let page = index_page(&row("//", "as in nothing", "none"), "", "");

    let sections = extractor().index(&page, &base()).unwrap();
    let err = sections[0].rows[0].as_ref().unwrap_err();
    assert!(err.is_structure_mismatch());
}

#[test]
fn missing_category_section_fails_the_index() {
    let page = r#"<html><body><div class="main-content">
        <div class="sqs-block html-block"><div class="sqs-block-content"><div>
          <h2>Sounds</h2><div></div>
        </div></div></div>
        </div></body></html>"#;

    let err = extractor().index(page, &base()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::StructureMismatch { what: "category section", .. }
    ));
}

#[test]
fn missing_section_container_fails_the_index() {
    let err = extractor()
        .index("<html><body><p>Gone</p></body></html>", &base())
        .unwrap_err();
    assert!(err.is_structure_mismatch());
}

#[test]
fn pronunciation_media() {
    let page = r#"<html><body><div class="main-content">
        <img src="/s/logo.png">
        <img src="/s/long-a.gif">
        <div class="sqs-audio-embed" data-url="https://cdn.test/long-a.mp3" data-title="eɪ"></div>
        </div></body></html>"#;

    let media = extractor().pronunciation(page, &base()).unwrap();
    assert_eq!(base().join("/s/long-a.gif").unwrap(), media.image_url);
    assert_eq!("https://cdn.test/long-a.mp3", media.audio_url.as_str());
}

#[test]
fn pronunciation_without_audio_is_a_mismatch() {
    let page = r#"<html><body><img src="/s/long-a.gif"></body></html>"#;

    let err = extractor().pronunciation(page, &base()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::StructureMismatch { what: "pronunciation audio", .. }
    ));
}

fn audio_block(word: &str) -> String {
    format!(
        r#"<div data-block-type="41"><div class="sqs-audio-embed" data-title="{word}" data-url="/a/{word}.mp3"></div></div>"#
    )
}

#[test]
fn spelling_words_with_transcriptions() {
    let page = format!(
        r#"<html><body><div class="main-content">
        <div data-block-type="2"><div class="sqs-block-content"><p>ab</p></div></div>
        <div data-block-type="2"><div class="sqs-block-content">
          <p>Spelled with ay</p><p>1: day <em>/deɪ/</em></p>
        </div></div>
        <div data-block-type="2"><div class="sqs-block-content"><p>2:&nbsp;rain <em>/reɪn/</em></p></div></div>
        <div data-block-type="2"><div class="sqs-block-content"><p>3: day again</p></div></div>
        {}{}{}
        <div data-block-type="41"><div class="sqs-audio-embed" data-title="broken"></div></div>
        </div></body></html>"#,
        audio_block("day"),
        audio_block("rain"),
        audio_block("eight"),
    );

    let items = extractor().spelling(&page, &base()).unwrap();
    assert_eq!(
        vec!["day", "rain", "eight"],
        items.iter().map(|i| i.word.as_str()).collect::<Vec<_>>()
    );
    assert_eq!("day <em>/deɪ/</em>", items[0].transcription);
    assert_eq!(base().join("/a/day.mp3").unwrap(), items[0].audio_url);
    assert_eq!("rain <em>/reɪn/</em>", items[1].transcription);
    assert_eq!("", items[2].transcription);
}

#[test]
fn spelling_without_main_content_is_a_mismatch() {
    let err = extractor()
        .spelling("<html><body></body></html>", &base())
        .unwrap_err();
    assert!(err.is_structure_mismatch());
}

fn embed(word: &str) -> String {
    format!(r#"<div class="sqs-audio-embed" data-title="{word}" data-url="/a/{word}.mp3"></div>"#)
}

fn practice_page(nodes: &str) -> String {
    format!(
        r#"<html><body><div class="main-content"><div><div><div>{nodes}</div></div></div></div></body></html>"#
    )
}

#[test]
fn practice_words_follow_active_heading() {
    let page = practice_page(&format!(
        "<div>{early}</div>\
         <div><h2>Beginning sound</h2>{cat}</div>\
         <div>{bat}</div>\
         <h2>End Sound</h2>\
         <div>{mad}</div>",
        early = embed("early"),
        cat = embed("cat"),
        bat = embed("bat"),
        mad = embed("mad"),
    ));

    let items = extractor().practice(&page, &base()).unwrap();
    let tagged = items
        .iter()
        .map(|i| (i.word.as_str(), i.position))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            ("cat", SoundPosition::Beginning),
            ("bat", SoundPosition::Beginning),
            ("mad", SoundPosition::End),
        ],
        tagged
    );
    assert_eq!(base().join("/a/mad.mp3").unwrap(), items[2].audio_url);
}

#[test]
fn practice_headings_are_case_insensitive() {
    let page = practice_page(&format!(
        "<div><h2>  MIDDLE\n  sound </h2></div><div>{}</div>",
        embed("table")
    ));

    let items = extractor().practice(&page, &base()).unwrap();
    assert_eq!(1, items.len());
    assert_eq!(SoundPosition::Middle, items[0].position);
}

#[test]
fn practice_embeds_under_unknown_heading_are_dropped() {
    let page = practice_page(&format!(
        "<div><h2>Beginning sound</h2>{}</div><div><h2>Tips</h2>{}</div>",
        embed("ape"),
        embed("tip")
    ));

    let items = extractor().practice(&page, &base()).unwrap();
    assert_eq!(
        vec!["ape"],
        items.iter().map(|i| i.word.as_str()).collect::<Vec<_>>()
    );
}

#[test]
fn practice_without_container_is_a_mismatch() {
    let page = r#"<html><body><div class="main-content"><div></div></div></body></html>"#;

    let err = extractor().practice(page, &base()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::StructureMismatch { what: "practice content", .. }
    ));
}

#[test]
fn template_overrides_keep_defaults() {
    let yaml = r#"
practice:
  beginningLabel: Initial sound
index:
  categories:
    - category: consonant
      child: 1
"#;
    let template: PageTemplate = serde_yaml::from_str(yaml).unwrap();
    let defaults = PageTemplate::default();

    assert_eq!("Initial sound", template.practice.beginning_label);
    assert_eq!(defaults.practice.end_label, template.practice.end_label);
    assert_eq!(defaults.practice.container, template.practice.container);
    assert_eq!(1, template.index.categories.len());
    assert_eq!(Category::Consonant, template.index.categories[0].category);
    assert_eq!(defaults.spelling, template.spelling);
}

#[test]
fn invalid_selector_is_rejected() {
    let mut template = PageTemplate::default();
    template.spelling.audio_blocks = "[[[".into();

    let err = PageExtractor::new(&template).unwrap_err();
    assert!(matches!(err, ExtractError::Selector { .. }));
}
