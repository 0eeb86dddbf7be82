pub trait Presenter {
    fn success(&mut self, message: &str);
    fn rejection(&mut self, message: &str);
    fn listing(&mut self, title: &str, lines: &[String]);
}
