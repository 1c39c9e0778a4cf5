//! TEI documents shared by the unit tests.

pub const TITLE_EL: &str = "<title>Lettera a Luigi</title>";

pub const BOTH: &str = r#"<correspAction type="sent"><persName key="viaf1">Mario Rossi</persName></correspAction>
        <correspAction type="received"><persName key="viaf2">Luigi Bianchi</persName></correspAction>"#;

pub const ONLY_SENT: &str =
    r#"<correspAction type="sent"><persName key="viaf1">Mario Rossi</persName></correspAction>"#;

pub const BODY: &str = r##"<p>Mario scrive
         a <persName ref="#p2">Luigi</persName>
      </p>
      <p>da Roma</p>"##;

pub fn letter(header_extra: &str, correspondents: &str) -> String {
    letter_with_body(header_extra, correspondents, BODY)
}

pub fn letter_with_body(header_extra: &str, correspondents: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc>
      <sourceDesc>
        <msDesc>
          <msIdentifier>
            <repository>Biblioteca Civica</repository>
            <idno>MS 12/3</idno>
          </msIdentifier>
          <msContents>
            <msItem>
              {header_extra}
              <textLang>italiano</textLang>
            </msItem>
          </msContents>
          <physDesc>
            <objectDesc>
              <supportDesc>
                <support>Carta <material>vergata</material>
                  con filigrana</support>
                <extent>2 carte</extent>
              </supportDesc>
            </objectDesc>
          </physDesc>
          <history>
            <origin>
              <origDate>1891 marzo 4</origDate>
              <origPlace key="3169070">Roma</origPlace>
            </origin>
          </history>
        </msDesc>
      </sourceDesc>
    </fileDesc>
    <profileDesc>
      <correspDesc>
        {correspondents}
      </correspDesc>
      <particDesc>
        <listPerson>
          <person xml:id="p1"><persName key="viaf1"><forename>Mario</forename> <surname>Rossi</surname></persName></person>
          <person xml:id="p2"><persName key="viaf2"><forename>Luigi</forename> <surname>Bianchi</surname></persName></person>
        </listPerson>
      </particDesc>
      <settingDesc>
        <listPlace>
          <place xml:id="l1"><placeName key="3169070">Roma</placeName></place>
        </listPlace>
      </settingDesc>
    </profileDesc>
  </teiHeader>
  <text>
    <body>
      {body}
    </body>
  </text>
</TEI>"#
    )
}
