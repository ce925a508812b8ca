//! Android Binary XML (ABX) codec for abxkit.
//!
//! Converts between XML text and the ABX wire format (version 0): a token
//! stream with typed attribute payloads and an interned string pool.
//!
//! # Architecture
//!
//! - **token** -- Wire-format constants: magic header, event and type nibbles
//! - **io** -- [`DataOutput`] / [`DataInput`] binary primitives and the pool
//! - **ser** -- [`AbxSerializer`] plus [`encode_str`] / [`encode_file`],
//!   streaming quick-xml events into tokens
//! - **de** -- [`decode`] / [`decode_to_string`], rendering tokens back to
//!   XML text
//!
//! The codec is stream-oriented on both sides; it never materializes a
//! document tree. Semantic round-trip fidelity is validated externally by
//! comparing the parsed input against the parsed decode output.

pub mod de;
pub mod error;
pub mod io;
pub mod ser;
pub mod token;

pub use de::{decode, decode_to_string};
pub use error::{AbxError, AbxResult};
pub use io::{DataInput, DataOutput};
pub use ser::{encode_file, encode_str, AbxSerializer, EncodeOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use abx_diff::diff_elements;
    use abx_tree::parse_str;

    fn roundtrip(xml: &str) -> String {
        let mut abx = Vec::new();
        encode_str(xml, &mut abx, EncodeOptions::default()).unwrap();
        decode_to_string(&abx).unwrap()
    }

    #[test]
    fn realistic_document_roundtrips_semantically() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<company name="Initech" active="true">
  <department id="eng" head="peter">
    <employee id="1" status="active">Peter Gibbons</employee>
    <employee id="2" status="inactive">Michael Bolton</employee>
  </department>
  <department id="ops">
    <note>Requires &amp; deserves a full review &lt;soon&gt;</note>
  </department>
</company>"#;

        let restored = roundtrip(xml);
        let original_tree = parse_str(xml).unwrap();
        let restored_tree = parse_str(&restored).unwrap();
        let diff = diff_elements(&original_tree, &restored_tree);
        assert!(
            diff.is_empty(),
            "round trip diverged: {:?}",
            diff.records
        );
    }

    #[test]
    fn whitespace_collapse_is_still_semantically_equal() {
        let xml = "<root>\n  <item status=\"done\">payload</item>\n</root>";
        let mut abx = Vec::new();
        encode_str(
            xml,
            &mut abx,
            EncodeOptions {
                preserve_whitespace: false,
            },
        )
        .unwrap();
        let restored = decode_to_string(&abx).unwrap();

        // The comparator trims text, so dropped indentation is invisible.
        let diff = diff_elements(
            &parse_str(xml).unwrap(),
            &parse_str(&restored).unwrap(),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn abx_is_smaller_than_repetitive_xml() {
        let mut xml = String::from("<records>");
        for i in 0..50 {
            xml.push_str(&format!(
                r#"<record status="active" category="standard">{i}</record>"#
            ));
        }
        xml.push_str("</records>");

        let mut abx = Vec::new();
        encode_str(&xml, &mut abx, EncodeOptions::default()).unwrap();
        assert!(abx.len() < xml.len());
    }

    #[test]
    fn decode_rejects_xml_input() {
        let err = decode_to_string(b"<?xml version=\"1.0\"?><a/>").unwrap_err();
        assert!(matches!(err, AbxError::InvalidMagic { .. }));
    }
}
