//! CSS parsing: the style index built from `<style>` blocks, plus raw
//! declaration-block parsing shared with inline `style` attributes.
//!
//! Declarations are kept as raw property/value strings. The converter never
//! needs typed CSS values; callers pull specific properties out with their
//! own fallbacks.

pub mod matcher;

use std::collections::HashMap;

use cssparser::{
    AtRuleParser, DeclarationParser, ParseError, Parser, ParserInput, QualifiedRuleParser,
    RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use selectors::parser::Selector;

use crate::dom::Dom;
use matcher::{MailSelectors, parse_selectors};

/// Flat property → value map, property names lowercased, values trimmed.
pub type PropertyMap = HashMap<String, String>;

/// One indexed rule: the selector as written, its parsed form (empty when the
/// syntax is outside the supported subset), and the merged declarations.
pub struct StyleRule {
    pub selector: String,
    pub selectors: Vec<Selector<MailSelectors>>,
    pub declarations: PropertyMap,
}

/// Selector → declarations index over every `<style>` block in the document.
///
/// Rules keep first-appearance order; a selector seen again merges its
/// declarations into the existing entry, later declarations winning.
#[derive(Default)]
pub struct StyleIndex {
    rules: Vec<StyleRule>,
    by_selector: HashMap<String, usize>,
}

impl StyleIndex {
    pub fn build(dom: &Dom) -> Self {
        let mut index = Self::default();
        for css in dom.style_block_texts() {
            index.add_block(&css);
        }
        index
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse one `<style>` block's text into the index. Unparsable rules are
    /// skipped; the rest of the block (and document) still contributes.
    fn add_block(&mut self, css: &str) {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut collected: Vec<(String, Vec<Selector<MailSelectors>>, Vec<(String, String)>)> =
            Vec::new();

        let mut rule_parser = RuleCollector {
            out: &mut collected,
        };
        let mut skipped = 0usize;
        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            if result.is_err() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} unparsable rule(s) in <style> block");
        }

        for (selector, parsed, declarations) in collected {
            if selector.is_empty() {
                continue;
            }
            self.merge(selector, parsed, declarations);
        }
    }

    fn merge(
        &mut self,
        selector: String,
        parsed: Vec<Selector<MailSelectors>>,
        declarations: Vec<(String, String)>,
    ) {
        let idx = match self.by_selector.get(&selector) {
            Some(&idx) => idx,
            None => {
                let idx = self.rules.len();
                self.rules.push(StyleRule {
                    selector: selector.clone(),
                    selectors: parsed,
                    declarations: PropertyMap::new(),
                });
                self.by_selector.insert(selector, idx);
                idx
            }
        };
        for (property, value) in declarations {
            self.rules[idx].declarations.insert(property, value);
        }
    }
}

struct RuleCollector<'a> {
    out: &'a mut Vec<(String, Vec<Selector<MailSelectors>>, Vec<(String, String)>)>,
}

impl<'i> AtRuleParser<'i> for RuleCollector<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    // At-rules (@media, @font-face) carry nothing the converter resolves.
    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for RuleCollector<'_> {
    type Prelude = (String, Vec<Selector<MailSelectors>>);
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        let parsed = parse_selectors(input).unwrap_or_default();
        // Consume whatever a failed selector parse left behind so the raw
        // selector text is still captured for the index.
        while input.next_including_whitespace().is_ok() {}
        let text = input.slice_from(start).trim().to_string();
        Ok((text, parsed))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let (selector, parsed) = prelude;
        let mut declarations = Vec::new();
        let mut collector = DeclarationCollector {
            out: &mut declarations,
        };
        for result in RuleBodyParser::new(input, &mut collector) {
            // Bad declarations are skipped individually.
            let _ = result;
        }
        self.out.push((selector, parsed, declarations));
        Ok(())
    }
}

struct DeclarationCollector<'a> {
    out: &'a mut Vec<(String, String)>,
}

impl<'i> AtRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for DeclarationCollector<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &cssparser::ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let property = name.as_ref().to_ascii_lowercase();
        let start = input.position();
        while input.next_including_whitespace().is_ok() {}
        let mut value = input.slice_from(start).trim().to_string();

        if let Some(pos) = value.rfind('!')
            && value[pos + 1..].trim().eq_ignore_ascii_case("important")
        {
            value.truncate(pos);
            value.truncate(value.trim_end().len());
        }

        if !value.is_empty() {
            self.out.push((property, value));
        }
        Ok(())
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationCollector<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Parse a bare declaration block (an inline `style` attribute).
pub fn parse_declaration_block(css: &str) -> PropertyMap {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();
    let mut collector = DeclarationCollector {
        out: &mut declarations,
    };
    for result in RuleBodyParser::new(&mut parser, &mut collector) {
        let _ = result;
    }

    let mut map = PropertyMap::new();
    for (property, value) in declarations {
        map.insert(property, value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn indexes_rules_from_style_blocks() {
        let dom = parse_html(
            "<style>p { color: red; font-size: 12px; } .promo { background-color: red; }</style>",
        );
        let index = StyleIndex::build(&dom);

        assert_eq!(index.rules().len(), 2);
        assert_eq!(index.rules()[0].selector, "p");
        assert_eq!(index.rules()[0].declarations["color"], "red");
        assert_eq!(index.rules()[0].declarations["font-size"], "12px");
        assert_eq!(index.rules()[1].selector, ".promo");
    }

    #[test]
    fn duplicate_selector_merges_last_wins() {
        let dom = parse_html(
            "<style>p { color: red; }</style>\
             <style>p { color: blue; font-weight: bold; }</style>",
        );
        let index = StyleIndex::build(&dom);

        assert_eq!(index.rules().len(), 1);
        assert_eq!(index.rules()[0].declarations["color"], "blue");
        assert_eq!(index.rules()[0].declarations["font-weight"], "bold");
    }

    #[test]
    fn bad_rule_does_not_poison_block() {
        let dom = parse_html("<style>} p { color: red; } { garbage</style>");
        let index = StyleIndex::build(&dom);

        assert!(index.rules().iter().any(|r| r.selector == "p"));
    }

    #[test]
    fn important_suffix_is_stripped() {
        let map = parse_declaration_block("color: #333 !important; padding: 5px");
        assert_eq!(map["color"], "#333");
        assert_eq!(map["padding"], "5px");
    }

    #[test]
    fn property_names_are_lowercased() {
        let map = parse_declaration_block("COLOR: red; Font-Size: 18px");
        assert_eq!(map["color"], "red");
        assert_eq!(map["font-size"], "18px");
    }

    #[test]
    fn unsupported_selector_still_indexed_without_matcher() {
        let dom = parse_html("<style>a:hover { color: red; }</style>");
        let index = StyleIndex::build(&dom);

        // captured for the index, but carries no parsed selectors to match
        let rule = index.rules().iter().find(|r| r.selector == "a:hover");
        if let Some(rule) = rule {
            assert!(rule.selectors.is_empty());
        }
    }
}
