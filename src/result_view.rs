use crate::engine_state::EngineState;
use crate::keyevent::KeySymbol;

///
/// エンジンの状態を読むだけのビュー。
/// 文字列は読むたびに状態から組み立てるので、常に最新の入力を反映する。
///
#[derive(Clone, Copy, Debug)]
pub struct ResultView<'a> {
    state: &'a EngineState,
}

impl<'a> ResultView<'a> {
    pub(crate) fn new(state: &'a EngineState) -> Self {
        Self { state }
    }

    /// 生成された文字列。未確定の入力も末尾に含む。
    pub fn final_text(&self) -> String {
        self.state.final_text()
    }

    /// 生成された、変換される前の文字列。
    pub fn raw_text(&self) -> String {
        self.state.raw_text()
    }

    /// 直前に受理された文字。
    pub fn last_accepted_char(&self) -> &'a str {
        &self.state.last_accepted
    }

    pub fn last_event(&self) -> Option<&'a KeySymbol> {
        self.state.last_event.as_ref()
    }

    pub fn committed(&self) -> &'a [String] {
        &self.state.committed
    }

    pub fn raw(&self) -> &'a [String] {
        &self.state.raw
    }

    pub fn pending(&self) -> &'a str {
        &self.state.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_reads_state() {
        let mut state = EngineState::new_test_state(&["か", "ん"], &["ka", "n"], "s");
        state.last_accepted = "s".to_string();
        let view = ResultView::new(&state);
        assert_eq!("かんs", view.final_text());
        assert_eq!("kans", view.raw_text());
        assert_eq!("s", view.last_accepted_char());
        assert_eq!(None, view.last_event());
        assert_eq!(2, view.committed().len());
        assert_eq!("s", view.pending());
    }
}
